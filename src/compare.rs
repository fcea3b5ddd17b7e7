//! Orderings that decide which element sits on top of a heap.

use std::cmp::Ordering;

/// A strict weak ordering over `T`, read as priority.
///
/// `compare(a, b) == Ordering::Greater` means `a` belongs nearer the top
/// than `b`. Elements comparing `Equal` may come out in any order.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// `true` when `a` must sit above `b`.
    #[inline]
    fn higher(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// Largest element on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<T: Ord + ?Sized> Compare<T> for MaxFirst {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Smallest element on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<T: Ord + ?Sized> Compare<T> for MinFirst {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Smallest projected key on top.
///
/// Useful when the element carries a payload next to its priority, or to add
/// a sequence number for first-in-first-out tie breaking.
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F>(pub F);

impl<T, K, F> Compare<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(b).cmp(&(self.0)(a))
    }
}

impl<T, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_orderings() {
        assert!(MaxFirst.higher(&3, &2));
        assert!(!MaxFirst.higher(&2, &2));
        assert!(MinFirst.higher(&2, &3));
        assert!(!MinFirst.higher(&3, &2));
    }

    #[test]
    fn by_key_puts_smallest_key_first() {
        let by_len = ByKey(|s: &&str| s.len());
        assert!(by_len.higher(&"ab", &"abc"));
        assert_eq!(by_len.compare(&"xy", &"ab"), Ordering::Equal);
    }

    #[test]
    fn closures_are_comparators() {
        let reversed = |a: &i32, b: &i32| b.cmp(a);
        assert!(reversed.higher(&1, &5));
    }
}
