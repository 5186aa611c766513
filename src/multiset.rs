use std::collections::BTreeMap;

use crate::sample::{midpoint, Ordered, Sample};
use crate::structure::OrderStatistic;

/// Sorted multiset of values, backed by a balanced tree of value counts
///
/// Inserts and removes are O(log k). Rank queries walk the distinct values in order,
/// so they cost O(d) for d distinct values in the window.
#[derive(Debug, Clone)]
pub struct SortedMultiset<T: Sample> {
    counts: BTreeMap<Ordered<T>, usize>,
    len: usize,
}

impl<T: Sample> Default for SortedMultiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> SortedMultiset<T> {
    /// Constructs an empty [`Self`]
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            len: 0,
        }
    }

    /// Number of distinct values held
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of copies of `value` held
    pub fn count(&self, value: T) -> usize {
        self.counts.get(&Ordered(value)).copied().unwrap_or(0)
    }

    /// Values at ranks `first` and `first + 1`, found in one walk
    fn adjacent(&self, first: usize) -> (Option<T>, Option<T>) {
        let mut seen = 0;
        let mut lower = None;
        for (key, count) in &self.counts {
            seen += count;
            if lower.is_none() && first < seen {
                lower = Some(key.0);
            }
            if first + 1 < seen {
                return (lower, Some(key.0));
            }
        }
        (lower, None)
    }
}

impl<T: Sample> OrderStatistic<T> for SortedMultiset<T> {
    fn insert(&mut self, value: T) {
        *self.counts.entry(Ordered(value)).or_insert(0) += 1;
        self.len += 1;
    }

    /// Values that are not held are ignored
    fn remove(&mut self, value: T) {
        let key = Ordered(value);
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
            self.len -= 1;
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn kth(&mut self, rank: usize) -> Option<T> {
        self.adjacent(rank).0
    }

    fn median(&mut self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }

        if self.len % 2 == 1 {
            self.adjacent(self.len / 2).0.map(Sample::to_f64)
        } else {
            match self.adjacent(self.len / 2 - 1) {
                (Some(lo), Some(hi)) => Some(midpoint(lo.to_f64(), hi.to_f64())),
                _ => None,
            }
        }
    }
}
