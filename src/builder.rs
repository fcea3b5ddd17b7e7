use crate::compare::{Compare, MinFirst};
use crate::error::Result;
use crate::DaryHeap;

/// Builder for [`DaryHeap`] instances with custom settings.
///
/// Arity is a const parameter of the heap itself and is picked at
/// [`HeapBuilder::build`] time, usually through the target type.
#[derive(Clone, Debug)]
pub struct HeapBuilder<C = MinFirst> {
    compare: C,
    capacity: usize,
}

impl HeapBuilder<MinFirst> {
    /// Create a new [`HeapBuilder`] with default settings: smallest element
    /// on top and no preallocated storage.
    pub fn new() -> Self {
        Self {
            compare: MinFirst,
            capacity: 0,
        }
    }
}

impl Default for HeapBuilder<MinFirst> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HeapBuilder<C> {
    /// Select the ordering the heap will use.
    pub fn comparator<C2>(self, compare: C2) -> HeapBuilder<C2> {
        HeapBuilder {
            compare,
            capacity: self.capacity,
        }
    }

    /// Preallocate room for `capacity` elements.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the heap. Aborts like [`Vec::with_capacity`] if the initial
    /// storage cannot be allocated.
    pub fn build<T, const D: usize>(self) -> DaryHeap<T, C, D>
    where
        C: Compare<T>,
    {
        DaryHeap::with_capacity_and_comparator(self.capacity, self.compare)
    }

    /// Build the heap, reporting [`crate::Error::AllocationFailure`] if the
    /// initial storage cannot be allocated.
    pub fn try_build<T, const D: usize>(self) -> Result<DaryHeap<T, C, D>>
    where
        C: Compare<T>,
    {
        let mut heap = DaryHeap::with_comparator(self.compare);
        heap.try_reserve(self.capacity)?;
        Ok(heap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Heap, MaxFirst};

    #[test]
    fn defaults_to_min_first_binary() {
        let mut heap: DaryHeap<u8> = HeapBuilder::new().capacity(16).build();
        assert!(heap.capacity() >= 16);
        assert_eq!(heap.arity(), 2);
        heap.insert(9).unwrap();
        heap.insert(4).unwrap();
        assert_eq!(heap.top(), Ok(&4));
    }

    #[test]
    fn comparator_and_arity() {
        let heap = HeapBuilder::new()
            .capacity(3)
            .comparator(MaxFirst)
            .build::<u8, 4>();
        assert_eq!(heap.arity(), 4);
        assert!(heap.capacity() >= 3);
        assert_eq!(heap.comparator(), &MaxFirst);
    }

    #[test]
    fn try_build_reports_impossible_capacity() {
        let built = HeapBuilder::new().capacity(usize::MAX).try_build::<u64, 2>();
        assert!(matches!(built, Err(Error::AllocationFailure(_))));
    }
}
