use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::sample::{midpoint, Ordered, Sample};
use crate::structure::OrderStatistic;

/// Two-heap median structure with lazy deletion
///
/// The smaller half of the values lives in a max-heap (`low`), the larger half in a min-heap (`high`).
/// After [`Self::rebalance`], `low` holds the extra element when the count is odd,
/// so the median is always readable from the heap tops.
///
/// Removal is deferred: [`Self::mark_for_removal`] only records the value in a shared
/// value-to-count ledger, and the stale copy is physically popped by [`Self::purge`]
/// once it surfaces at the top of its heap.
/// Every read of a top goes through a purge first.
#[derive(Debug, Clone)]
pub struct DualHeap<T: Sample> {
    /// Max-heap holding the lower half, including stale entries charged to it
    low: BinaryHeap<Ordered<T>>,
    /// Min-heap holding the upper half, including stale entries charged to it
    high: BinaryHeap<Reverse<Ordered<T>>>,

    /// Outstanding deletions, keyed by value. Never holds a zero count.
    pending: BTreeMap<Ordered<T>, usize>,

    /// Number of valid (not pending deletion) values in `low`
    low_len: usize,
    /// Number of valid (not pending deletion) values in `high`
    high_len: usize,
}

impl<T: Sample> Default for DualHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> DualHeap<T> {
    /// Constructs an empty [`Self`]
    pub fn new() -> Self {
        Self {
            low: BinaryHeap::new(),
            high: BinaryHeap::new(),
            pending: BTreeMap::new(),
            low_len: 0,
            high_len: 0,
        }
    }

    /// Constructs an empty [`Self`], with room for a window of `window_size` values in each heap
    ///
    /// Stale entries can make a heap briefly outgrow its half of the window,
    /// so each heap reserves the full window size.
    pub fn with_capacity(window_size: usize) -> Self {
        Self {
            low: BinaryHeap::with_capacity(window_size),
            high: BinaryHeap::with_capacity(window_size),
            ..Self::new()
        }
    }

    /// Number of valid values held, excluding those pending deletion
    pub fn len(&self) -> usize {
        self.low_len + self.high_len
    }

    /// Whether no valid values are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of valid values in the lower half
    pub fn low_len(&self) -> usize {
        self.low_len
    }

    /// Number of valid values in the upper half
    pub fn high_len(&self) -> usize {
        self.high_len
    }

    /// Total number of deletions recorded but not yet applied to a heap
    pub fn pending_deletions(&self) -> usize {
        self.pending.values().sum()
    }

    /// Adds a value to the half it belongs to
    ///
    /// Values not greater than the lower half's top go low, everything else goes high.
    /// This can leave the halves unbalanced by one; call [`Self::rebalance`] before reading the median.
    pub fn insert(&mut self, value: T) {
        self.purge();

        let key = Ordered(value);
        match self.low.peek() {
            Some(top) if key > *top => {
                self.high.push(Reverse(key));
                self.high_len += 1;
            }
            _ => {
                self.low.push(key);
                self.low_len += 1;
            }
        }
    }

    /// Records that one copy of `value` has left the window
    ///
    /// The copy is charged to the half it sits in, decided against the freshly purged lower top:
    /// a value not greater than that top lives low, anything greater lives high.
    /// Nothing is popped for `value` itself; its copy stays in place until [`Self::purge`] meets it.
    ///
    /// Marking a value that was never inserted breaks the structure's accounting.
    /// Debug builds panic on it once a half would go negative.
    pub fn mark_for_removal(&mut self, value: T) {
        self.purge();

        let key = Ordered(value);
        match self.low.peek() {
            Some(top) if key <= *top => {
                debug_assert!(self.low_len > 0, "removed {value:?} from an empty lower half");
                self.low_len -= 1;
            }
            _ => {
                debug_assert!(self.high_len > 0, "removed {value:?} from an empty upper half");
                self.high_len -= 1;
            }
        }

        *self.pending.entry(key).or_insert(0) += 1;
    }

    /// Restores the size invariant `high_len <= low_len <= high_len + 1`
    ///
    /// Both tops are purged before any size comparison, and again after every move.
    pub fn rebalance(&mut self) {
        self.purge();

        while self.high_len > self.low_len {
            let Some(Reverse(top)) = self.high.pop() else {
                break;
            };
            self.low.push(top);
            self.high_len -= 1;
            self.low_len += 1;
            self.purge();
        }

        while self.low_len > self.high_len + 1 {
            let Some(top) = self.low.pop() else {
                break;
            };
            self.high.push(Reverse(top));
            self.low_len -= 1;
            self.high_len += 1;
            self.purge();
        }
    }

    /// Pops stale values off both heap tops, consuming their pending deletions
    ///
    /// The lower heap is always purged first. Calling this twice in a row is a no-op the second time.
    pub fn purge(&mut self) {
        while let Some(&top) = self.low.peek() {
            if !consume(&mut self.pending, top) {
                break;
            }
            self.low.pop();
        }

        while let Some(&Reverse(top)) = self.high.peek() {
            if !consume(&mut self.pending, top) {
                break;
            }
            self.high.pop();
        }
    }

    /// Median of the current contents, assuming they make up a window of `window_size` values
    ///
    /// For odd windows this is the lower top, for even windows the midpoint of both tops.
    /// Returns [`None`] if a required top is missing, which means the window is incomplete.
    pub fn median(&mut self, window_size: usize) -> Option<f64> {
        self.purge();

        let lo = self.low.peek()?.0.to_f64();
        if window_size % 2 == 1 {
            Some(lo)
        } else {
            let Reverse(hi) = self.high.peek()?;
            Some(midpoint(lo, hi.0.to_f64()))
        }
    }

    /// Lower and upper valid tops, in that order
    pub fn tops(&mut self) -> (Option<T>, Option<T>) {
        self.purge();
        (
            self.low.peek().map(|top| top.0),
            self.high.peek().map(|Reverse(top)| top.0),
        )
    }

    /// All valid values in ascending order
    ///
    /// This walks both heaps, so it costs O(k log k).
    pub fn sorted_values(&self) -> Vec<T> {
        let mut all: Vec<Ordered<T>> = self
            .low
            .iter()
            .copied()
            .chain(self.high.iter().map(|Reverse(v)| *v))
            .collect();
        all.sort_unstable();

        let mut pending = self.pending.clone();
        all.into_iter()
            .filter(|key| !consume(&mut pending, *key))
            .map(|key| key.0)
            .collect()
    }
}

/// Takes one pending deletion for `key`, returning whether there was one
fn consume<T: Sample>(pending: &mut BTreeMap<Ordered<T>, usize>, key: Ordered<T>) -> bool {
    match pending.get_mut(&key) {
        Some(count) => {
            *count -= 1;
            if *count == 0 {
                pending.remove(&key);
            }
            true
        }
        None => false,
    }
}

impl<T: Sample> OrderStatistic<T> for DualHeap<T> {
    fn insert(&mut self, value: T) {
        DualHeap::insert(self, value);
    }

    fn remove(&mut self, value: T) {
        DualHeap::mark_for_removal(self, value);
    }

    fn rebalance(&mut self) {
        DualHeap::rebalance(self);
    }

    fn len(&self) -> usize {
        DualHeap::len(self)
    }

    /// Ranks on either side of the partition are read off the tops,
    /// any other rank falls back to a full scan
    fn kth(&mut self, rank: usize) -> Option<T> {
        DualHeap::rebalance(self);

        if rank >= DualHeap::len(self) {
            None
        } else if rank + 1 == self.low_len {
            self.tops().0
        } else if rank == self.low_len {
            self.tops().1
        } else {
            self.sorted_values().get(rank).copied()
        }
    }

    fn median(&mut self) -> Option<f64> {
        DualHeap::rebalance(self);
        let len = DualHeap::len(self);
        if len == 0 {
            return None;
        }
        DualHeap::median(self, len)
    }
}
