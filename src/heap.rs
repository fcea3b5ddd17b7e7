use crate::error::Result;

/// An addressable priority queue.
///
/// Elements are ordered by a comparator fixed when the heap is built; the
/// element with the highest priority under that comparator is the "top".
/// Inserting returns a handle that keeps referring to the same element until
/// it leaves the heap, however often the element moves internally.
pub trait Heap<T> {
    type Handle;

    /// Peek at the best element.
    fn top(&self) -> Result<&T>;

    /// Move every element of `heap_to_merge` into `self`.
    ///
    /// Handles obtained from `heap_to_merge` do not refer to its moved
    /// elements in the merged heap.
    fn merge(self, heap_to_merge: Self) -> Self;

    fn insert(&mut self, element: T) -> Result<Self::Handle>;

    /// Remove and return the best element.
    fn extract_top(&mut self) -> Result<T>;

    /// Replace the element behind `handle` and restore heap order.
    fn update(&mut self, handle: &Self::Handle, new_element: T) -> Result<()>;

    /// Remove the element behind `handle`, wherever it sits in the heap.
    fn erase(&mut self, handle: &Self::Handle) -> Result<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
