use crate::dual_heap::DualHeap;
use crate::multiset::SortedMultiset;
use crate::sample::{midpoint, Sample};

/// A multiset that can answer order-statistic queries
///
/// This is the seam between a [`crate::WindowTracker`] and the structure holding its window.
/// Removals are only ever issued for values that were previously inserted and not yet removed.
pub trait OrderStatistic<T: Sample> {
    /// Adds one copy of `value`
    fn insert(&mut self, value: T);

    /// Removes one copy of `value`
    fn remove(&mut self, value: T);

    /// Restores internal balance after a batch of inserts and removes
    ///
    /// Structures that are always balanced leave this as a no-op.
    fn rebalance(&mut self) {}

    /// Number of values held
    fn len(&self) -> usize;

    /// Whether no values are held
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value at zero-based `rank` in ascending order, if there is one
    fn kth(&mut self, rank: usize) -> Option<T>;

    /// Median of everything held, or [`None`] if empty
    fn median(&mut self) -> Option<f64> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        let upper = self.kth(len / 2)?.to_f64();
        if len % 2 == 1 {
            Some(upper)
        } else {
            let lower = self.kth(len / 2 - 1)?.to_f64();
            Some(midpoint(lower, upper))
        }
    }
}

/// Which [`OrderStatistic`] implementation backs a tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Structure {
    /// Two heaps with lazy deletion. O(log k) per step, O(1) median reads.
    #[default]
    DualHeap,
    /// Balanced-tree multiset of value counts. O(log k) updates, medians walk the distinct values.
    SortedMultiset,
}

/// An [`OrderStatistic`] chosen at runtime through a [`Structure`]
#[derive(Debug, Clone)]
pub enum Backend<T: Sample> {
    /// See [`Structure::DualHeap`]
    DualHeap(DualHeap<T>),
    /// See [`Structure::SortedMultiset`]
    SortedMultiset(SortedMultiset<T>),
}

impl<T: Sample> Backend<T> {
    /// Constructs an empty backend of the given kind, sized for `window_size` values
    pub fn new(structure: Structure, window_size: usize) -> Self {
        match structure {
            Structure::DualHeap => Self::DualHeap(DualHeap::with_capacity(window_size)),
            Structure::SortedMultiset => Self::SortedMultiset(SortedMultiset::new()),
        }
    }

    /// The kind of structure in use
    pub fn structure(&self) -> Structure {
        match self {
            Self::DualHeap(_) => Structure::DualHeap,
            Self::SortedMultiset(_) => Structure::SortedMultiset,
        }
    }
}

impl<T: Sample> OrderStatistic<T> for Backend<T> {
    fn insert(&mut self, value: T) {
        match self {
            Self::DualHeap(s) => OrderStatistic::insert(s, value),
            Self::SortedMultiset(s) => OrderStatistic::insert(s, value),
        }
    }

    fn remove(&mut self, value: T) {
        match self {
            Self::DualHeap(s) => OrderStatistic::remove(s, value),
            Self::SortedMultiset(s) => OrderStatistic::remove(s, value),
        }
    }

    fn rebalance(&mut self) {
        match self {
            Self::DualHeap(s) => OrderStatistic::rebalance(s),
            Self::SortedMultiset(s) => OrderStatistic::rebalance(s),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::DualHeap(s) => OrderStatistic::len(s),
            Self::SortedMultiset(s) => OrderStatistic::len(s),
        }
    }

    fn kth(&mut self, rank: usize) -> Option<T> {
        match self {
            Self::DualHeap(s) => s.kth(rank),
            Self::SortedMultiset(s) => s.kth(rank),
        }
    }

    fn median(&mut self) -> Option<f64> {
        match self {
            Self::DualHeap(s) => OrderStatistic::median(s),
            Self::SortedMultiset(s) => OrderStatistic::median(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_structure_is_dual_heap() {
        assert_eq!(Structure::default(), Structure::DualHeap);
        assert_eq!(
            Backend::<i32>::new(Structure::default(), 4).structure(),
            Structure::DualHeap
        );
    }

    #[test]
    fn backends_agree() {
        let mut heap = Backend::new(Structure::DualHeap, 8);
        let mut tree = Backend::new(Structure::SortedMultiset, 8);
        assert_eq!(tree.structure(), Structure::SortedMultiset);

        for v in [7, -2, 7, 0, 11, 3, 3, -2] {
            heap.insert(v);
            tree.insert(v);
        }
        for v in [7, -2, 11] {
            heap.remove(v);
            tree.remove(v);
        }

        assert_eq!(heap.len(), 5);
        assert_eq!(tree.len(), 5);
        for rank in 0..6 {
            assert_eq!(heap.kth(rank), tree.kth(rank), "rank {rank}");
        }
        assert_eq!(heap.median(), Some(3.));
        assert_eq!(tree.median(), Some(3.));
    }
}
