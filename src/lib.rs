//! A mutable d-ary heap with stable handles.
//!
//! [`DaryHeap`] keeps its elements in a dense array laid out as a complete
//! d-ary tree. Every insertion returns a [`Handle`] which keeps pointing at the
//! same logical element while sift operations move it around, so the element
//! can later be read, re-prioritized or erased without searching for it.
//!
//! ```
//! use daryq::{BinaryHeap, Heap};
//!
//! let mut heap: BinaryHeap<u32> = BinaryHeap::new();
//! heap.insert(10).unwrap();
//! heap.insert(20).unwrap();
//! let thirty = heap.insert(30).unwrap();
//!
//! heap.update(&thirty, 1).unwrap();
//! assert_eq!(heap.top(), Ok(&1));
//! assert_eq!(heap.extract_top(), Ok(1));
//! assert!(heap.get(&thirty).is_err());
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};

use slab::Slab;
use tracing::{debug, trace};

pub use crate::builder::HeapBuilder;
pub use crate::compare::{ByKey, Compare, MaxFirst, MinFirst};
pub use crate::error::{Error, Result};
pub use crate::heap::Heap;

mod builder;
pub mod compare;
mod error;
mod heap;

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

// Shared by every heap so that clones never mint the same stamp.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(0);

/// Stable reference to an element of a [`DaryHeap`].
///
/// Valid from the [`Heap::insert`] that returned it until its element is
/// extracted or erased. A handle is only meaningful to the heap that issued
/// it; any other heap rejects it with [`Error::InvalidHandle`]. A clone
/// accepts handles of elements that existed when it was cloned, but never
/// handles minted by the other copy afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    heap: u64,
    key: usize,
    stamp: u64,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    element: T,
    key: usize,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    index: usize,
    stamp: u64,
}

/// Array-backed d-ary heap with handle-based mutation.
///
/// The comparator `C` decides priority (see [`Compare`]); the element it
/// ranks highest is the top. `D` is the number of children per node and
/// must be at least 2.
#[derive(Clone)]
pub struct DaryHeap<T, C = MinFirst, const D: usize = 2> {
    slots: Vec<Slot<T>>,
    handles: Slab<Entry>,
    id: u64,
    compare: C,
}

/// A [`DaryHeap`] with two children per node.
pub type BinaryHeap<T, C = MinFirst> = DaryHeap<T, C, 2>;

impl<T, C: Compare<T>, const D: usize> Heap<T> for DaryHeap<T, C, D> {
    type Handle = Handle;

    fn top(&self) -> Result<&T> {
        match self.slots.first() {
            Some(slot) => Ok(&slot.element),
            None => {
                debug!("top requested on an empty heap");
                Err(Error::EmptyHeap)
            }
        }
    }

    fn merge(mut self, heap_to_merge: Self) -> Self {
        trace!(
            len = self.slots.len(),
            merged = heap_to_merge.slots.len(),
            "merging heaps"
        );
        let rebuild = heap_to_merge.slots.len() >= self.slots.len();
        self.reserve(heap_to_merge.slots.len());
        for slot in heap_to_merge.slots {
            if rebuild {
                self.append(slot.element);
            } else {
                self.push(slot.element);
            }
        }
        if rebuild {
            self.rebuild();
        }
        self
    }

    fn insert(&mut self, element: T) -> Result<Handle> {
        self.try_reserve(1)?;
        Ok(self.push(element))
    }

    fn extract_top(&mut self) -> Result<T> {
        if self.slots.is_empty() {
            debug!("extract_top requested on an empty heap");
            return Err(Error::EmptyHeap);
        }
        Ok(self.remove_root())
    }

    fn update(&mut self, handle: &Handle, new_element: T) -> Result<()> {
        let index = self.resolve(handle)?;
        self.slots[index].element = new_element;
        self.repair(index);
        Ok(())
    }

    fn erase(&mut self, handle: &Handle) -> Result<T> {
        let mut index = self.resolve(handle)?;
        trace!(?handle, index, "erasing element");
        // Treat the element as if it outranked everything: walk it up to the root.
        while index > 0 {
            let parent = Self::parent(index);
            self.swap(index, parent);
            index = parent;
        }
        Ok(self.remove_root())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T, C: Compare<T>, const D: usize> DaryHeap<T, C, D> {
    const VALID_ARITY: () = assert!(D >= 2, "a d-ary heap needs at least two children per node");

    /// Empty heap ordered by `compare`.
    pub fn with_comparator(compare: C) -> Self {
        let () = Self::VALID_ARITY;
        DaryHeap {
            slots: Vec::new(),
            handles: Slab::new(),
            id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
            compare,
        }
    }

    /// Empty heap ordered by `compare`, with room for `capacity` elements.
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        let mut heap = Self::with_comparator(compare);
        heap.reserve(capacity);
        heap
    }

    /// Number of children per node.
    pub const fn arity(&self) -> usize {
        D
    }

    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Read the element behind `handle`.
    pub fn get(&self, handle: &Handle) -> Result<&T> {
        let index = self.resolve(handle)?;
        Ok(&self.slots[index].element)
    }

    /// Whether `handle` still refers to an element of this heap.
    pub fn contains(&self, handle: &Handle) -> bool {
        self.lookup(handle).is_some()
    }

    /// Handle of the current top element.
    pub fn top_handle(&self) -> Result<Handle> {
        match self.slots.first() {
            Some(slot) => Ok(self.handle_for(slot.key)),
            None => {
                debug!("top_handle requested on an empty heap");
                Err(Error::EmptyHeap)
            }
        }
    }

    /// Replace an element whose priority is known to have gone up.
    ///
    /// Only sifts toward the root in the expected case. If the priority
    /// actually went down the element is sifted toward the leaves instead,
    /// so the heap stays ordered either way.
    pub fn increase(&mut self, handle: &Handle, new_element: T) -> Result<()> {
        let index = self.resolve(handle)?;
        self.slots[index].element = new_element;
        if self.sift_up(index) == index {
            self.sift_down(index);
        }
        Ok(())
    }

    /// Replace an element whose priority is known to have gone down.
    ///
    /// Counterpart of [`DaryHeap::increase`].
    pub fn decrease(&mut self, handle: &Handle, new_element: T) -> Result<()> {
        let index = self.resolve(handle)?;
        self.slots[index].element = new_element;
        if self.sift_down(index) == index {
            self.sift_up(index);
        }
        Ok(())
    }

    /// Change the element behind `handle` in place and restore heap order.
    pub fn modify<F>(&mut self, handle: &Handle, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let index = self.resolve(handle)?;
        f(&mut self.slots[index].element);
        self.repair(index);
        Ok(())
    }

    /// Drop every element. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        trace!(len = self.slots.len(), "clearing heap");
        self.slots.clear();
        self.handles.clear();
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Make room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`, like [`Vec::reserve`].
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.handles.reserve(additional);
    }

    /// Fallible [`DaryHeap::reserve`].
    ///
    /// The element array is grown first; the handle table only follows once
    /// that succeeded, so an error leaves the heap exactly as it was.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        if self.slots.capacity() - self.slots.len() < additional {
            if let Err(err) = self.slots.try_reserve(additional) {
                debug!(%err, additional, "element storage exhausted");
                return Err(err.into());
            }
            trace!(capacity = self.slots.capacity(), "grew element storage");
        }
        self.handles.reserve(additional);
        Ok(())
    }

    pub fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.handles.shrink_to_fit();
    }

    /// Iterate over all elements and their handles in storage order, which
    /// is not priority order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            handles: &self.handles,
            heap: self.id,
        }
    }

    /// Consume the heap, returning its elements best first.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.slots.len());
        while !self.slots.is_empty() {
            sorted.push(self.remove_root());
        }
        sorted
    }

    fn parent(index: usize) -> usize {
        (index - 1) / D
    }

    fn first_child(index: usize) -> usize {
        index.saturating_mul(D).saturating_add(1)
    }

    fn handle_for(&self, key: usize) -> Handle {
        Handle {
            heap: self.id,
            key,
            stamp: self.handles[key].stamp,
        }
    }

    fn lookup(&self, handle: &Handle) -> Option<usize> {
        if handle.heap != self.id {
            return None;
        }
        match self.handles.get(handle.key) {
            Some(entry) if entry.stamp == handle.stamp => Some(entry.index),
            _ => None,
        }
    }

    fn resolve(&self, handle: &Handle) -> Result<usize> {
        self.lookup(handle).ok_or_else(|| {
            debug!(?handle, "handle does not resolve");
            Error::InvalidHandle
        })
    }

    /// Add an element at the end of the array without restoring order.
    fn append(&mut self, element: T) -> Handle {
        let index = self.slots.len();
        let stamp = NEXT_STAMP.fetch_add(1, Ordering::Relaxed);
        let key = self.handles.insert(Entry { index, stamp });
        self.slots.push(Slot { element, key });
        Handle {
            heap: self.id,
            key,
            stamp,
        }
    }

    fn push(&mut self, element: T) -> Handle {
        let handle = self.append(element);
        self.sift_up(self.slots.len() - 1);
        handle
    }

    /// Heapify the whole array bottom-up.
    fn rebuild(&mut self) {
        if self.slots.len() < 2 {
            return;
        }
        for index in (0..=Self::parent(self.slots.len() - 1)).rev() {
            self.sift_down(index);
        }
    }

    /// Caller guarantees the heap is not empty.
    fn remove_root(&mut self) -> T {
        let removed = self.slots.swap_remove(0);
        self.handles.remove(removed.key);
        if let Some(moved) = self.slots.first() {
            self.handles[moved.key].index = 0;
            self.sift_down(0);
        }
        removed.element
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.handles[self.slots[a].key].index = a;
        self.handles[self.slots[b].key].index = b;
    }

    fn repair(&mut self, index: usize) {
        if self.sift_up(index) == index {
            self.sift_down(index);
        }
    }

    /// Returns the final position of the element.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = Self::parent(index);
            if !self
                .compare
                .higher(&self.slots[index].element, &self.slots[parent].element)
            {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    /// Returns the final position of the element.
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.slots.len();
        loop {
            let first = Self::first_child(index);
            if first >= len {
                break;
            }
            let end = first.saturating_add(D).min(len);
            let mut best = first;
            for child in first + 1..end {
                if self
                    .compare
                    .higher(&self.slots[child].element, &self.slots[best].element)
                {
                    best = child;
                }
            }
            if !self
                .compare
                .higher(&self.slots[best].element, &self.slots[index].element)
            {
                break;
            }
            self.swap(index, best);
            index = best;
        }
        index
    }
}

impl<T, C: Compare<T> + Default, const D: usize> DaryHeap<T, C, D> {
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, C::default())
    }
}

impl<T, C: Compare<T> + Default, const D: usize> Default for DaryHeap<T, C, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C, const D: usize> fmt::Debug for DaryHeap<T, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements: Vec<&T> = self.slots.iter().map(|slot| &slot.element).collect();
        f.debug_struct("DaryHeap")
            .field("arity", &D)
            .field("elements", &elements)
            .finish()
    }
}

impl<T, C: Compare<T>, const D: usize> Extend<T> for DaryHeap<T, C, D> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for element in iter {
            self.push(element);
        }
    }
}

impl<T, C: Compare<T> + Default, const D: usize> FromIterator<T> for DaryHeap<T, C, D> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut heap = Self::with_capacity(iter.size_hint().0);
        for element in iter {
            heap.append(element);
        }
        heap.rebuild();
        heap
    }
}

impl<'a, T, C: Compare<T>, const D: usize> IntoIterator for &'a DaryHeap<T, C, D> {
    type Item = (Handle, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Unordered iterator returned by [`DaryHeap::iter`].
pub struct Iter<'a, T> {
    slots: std::slice::Iter<'a, Slot<T>>,
    handles: &'a Slab<Entry>,
    heap: u64,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.next()?;
        let handle = Handle {
            heap: self.heap,
            key: slot.key,
            stamp: self.handles[slot.key].stamp,
        };
        Some((handle, &slot.element))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
impl<T, C: Compare<T>, const D: usize> DaryHeap<T, C, D> {
    /// Panics unless heap order, the handle table and density all agree.
    pub(crate) fn assert_valid(&self) {
        assert_eq!(self.handles.len(), self.slots.len());
        for (index, slot) in self.slots.iter().enumerate() {
            assert_eq!(self.handles[slot.key].index, index);
            if index > 0 {
                let parent = &self.slots[Self::parent(index)].element;
                assert!(!self.compare.higher(&slot.element, parent));
            }
        }
    }
}
