use crate::dual_heap::DualHeap;
use crate::error::{Result, WindowError};
use crate::sample::Sample;
use crate::structure::{Backend, OrderStatistic, Structure};

/// Fixed-capacity FIFO of the values currently in the window
///
/// Once full, every push overwrites the oldest slot and hands back the value it held.
#[derive(Debug, Clone)]
pub(crate) struct RingBuffer<T> {
    slots: Vec<T>,
    /// Index of the oldest value, once the buffer is full
    head: usize,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Appends `value`, returning the value it evicted if the buffer was full
    pub(crate) fn push(&mut self, value: T) -> Option<T> {
        if self.slots.len() < self.capacity {
            self.slots.push(value);
            return None;
        }

        let evicted = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Values from oldest to newest
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer)
    }
}

/// Lifecycle of a [`WindowTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerState {
    /// Fewer than `window_size` values seen. No medians are produced yet.
    Filling,
    /// The window is full and every push produces a median
    Sliding,
}

/// Exact median of a sliding window over a stream
///
/// Values are fed one at a time with [`Self::push`].
/// Nothing is reported until `window_size` values have been seen;
/// from then on, every push slides the window by one and returns its median.
///
/// The window itself is kept in a ring buffer, so the tracker works over streams of any length
/// without needing random access to past input.
/// The order statistics are delegated to `S`, which defaults to a [`DualHeap`].
///
/// A tracker is single-pass: there is no way back to [`TrackerState::Filling`].
/// To process another stream, construct a fresh tracker.
#[derive(Debug, Clone)]
pub struct WindowTracker<T: Sample, S = DualHeap<T>> {
    window_size: usize,
    window: RingBuffer<T>,
    structure: S,

    /// Total values pushed so far
    seen: u64,
}

impl<T: Sample> WindowTracker<T> {
    /// Constructs a tracker backed by a [`DualHeap`]
    ///
    /// Fails with [`WindowError::InvalidWindowSize`] if `window_size` is zero.
    pub fn new(window_size: usize) -> Result<Self> {
        Self::with_backend(window_size, DualHeap::with_capacity(window_size))
    }
}

impl<T: Sample> WindowTracker<T, Backend<T>> {
    /// Constructs a tracker backed by the given kind of [`Structure`]
    pub fn with_structure(window_size: usize, structure: Structure) -> Result<Self> {
        Self::with_backend(window_size, Backend::new(structure, window_size))
    }
}

impl<T: Sample, S: OrderStatistic<T>> WindowTracker<T, S> {
    /// Constructs a tracker around an existing, empty order-statistic structure
    pub fn with_backend(window_size: usize, structure: S) -> Result<Self> {
        if window_size == 0 {
            return Err(WindowError::InvalidWindowSize {
                window: window_size,
            });
        }

        #[cfg(feature = "log")]
        log::debug!("Tracking sliding median over a window of {window_size}");

        Ok(Self {
            window_size,
            window: RingBuffer::new(window_size),
            structure,
            seen: 0,
        })
    }

    /// Processes the next value in the stream
    ///
    /// Returns the median of the window ending at this value,
    /// or [`None`] while the window is still filling.
    pub fn push(&mut self, value: T) -> Option<f64> {
        if value.is_nan() {
            #[cfg(feature = "log")]
            log::warn!("NaN pushed at position {}. Medians covering it are unreliable.", self.seen);

            #[cfg(not(feature = "log"))]
            eprintln!("NaN pushed at position {}. Medians covering it are unreliable.", self.seen);
        }

        self.seen += 1;
        self.structure.insert(value);
        if let Some(evicted) = self.window.push(value) {
            self.structure.remove(evicted);
        }

        if !self.window.is_full() {
            return None;
        }

        if self.seen == self.window_size as u64 {
            #[cfg(feature = "log")]
            log::trace!("Window of {} filled, now sliding", self.window_size);
        }

        self.structure.rebalance();
        self.structure.median()
    }

    /// Median of the current window, without advancing it
    ///
    /// Returns [`None`] while the window is still filling.
    pub fn median(&mut self) -> Option<f64> {
        if self.window.is_full() {
            self.structure.median()
        } else {
            None
        }
    }

    /// Number of values per window
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of values currently in the window
    ///
    /// This only differs from [`Self::window_size`] while filling.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether no values have been pushed yet
    pub fn is_empty(&self) -> bool {
        self.seen == 0
    }

    /// Total number of values pushed
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Whether the window holds `window_size` values
    pub fn is_full(&self) -> bool {
        self.window.is_full()
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackerState {
        if self.is_full() {
            TrackerState::Sliding
        } else {
            TrackerState::Filling
        }
    }

    /// Values currently in the window, oldest first
    pub fn window(&self) -> impl Iterator<Item = T> + '_ {
        self.window.iter().copied()
    }

    /// The structure holding the window's order statistics
    pub fn structure(&self) -> &S {
        &self.structure
    }
}

impl<T: Sample, S: OrderStatistic<T>> Extend<T> for WindowTracker<T, S> {
    /// Pushes every value, discarding the medians
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiset::SortedMultiset;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut ring = RingBuffer::new(3);
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.push(3), None);
        assert!(ring.is_full());

        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.push(5), Some(2));
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);

        assert_eq!(ring.push(6), Some(3));
        assert_eq!(ring.push(7), Some(4));
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![5, 6, 7]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn zero_window_rejected() {
        let err = WindowTracker::<i32>::new(0).unwrap_err();
        assert_eq!(err, WindowError::InvalidWindowSize { window: 0 });
        assert!(err.is_window_error());
    }

    #[test]
    fn filling_then_sliding() {
        let mut tracker = WindowTracker::new(3).unwrap();
        assert_eq!(tracker.state(), TrackerState::Filling);
        assert!(tracker.is_empty());

        assert_eq!(tracker.push(1), None);
        assert_eq!(tracker.push(3), None);
        assert_eq!(tracker.median(), None);
        assert_eq!(tracker.state(), TrackerState::Filling);
        assert_eq!(tracker.len(), 2);

        assert_eq!(tracker.push(-1), Some(1.));
        assert_eq!(tracker.state(), TrackerState::Sliding);
        assert_eq!(tracker.median(), Some(1.));

        assert_eq!(tracker.push(-3), Some(-1.));
        assert_eq!(tracker.state(), TrackerState::Sliding);
        assert_eq!(tracker.seen(), 4);
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.window().collect::<Vec<_>>(), vec![3, -1, -3]);
    }

    #[test]
    fn scenario_a_streaming() {
        let mut tracker = WindowTracker::new(3).unwrap();
        let medians: Vec<f64> = [1, 3, -1, -3, 5, 3, 6, 7]
            .into_iter()
            .filter_map(|v| tracker.push(v))
            .collect();

        assert_eq!(medians, vec![1., -1., -1., 3., 5., 6.]);
    }

    #[test]
    fn window_of_one() {
        let mut tracker = WindowTracker::new(1).unwrap();
        for v in [5, 2, 8, 1, 9] {
            assert_eq!(tracker.push(v), Some(v as f64));
        }
    }

    #[test]
    fn even_window_is_fractional() {
        let mut tracker = WindowTracker::new(2).unwrap();
        assert_eq!(tracker.push(1_u8), None);
        assert_eq!(tracker.push(2), Some(1.5));
        assert_eq!(tracker.push(2), Some(2.));
        assert_eq!(tracker.push(255), Some(128.5));
    }

    #[test]
    fn extreme_integers_do_not_overflow() {
        let mut tracker = WindowTracker::new(2).unwrap();
        tracker.push(i64::MAX);
        assert_eq!(tracker.push(i64::MAX), Some(i64::MAX as f64));
        assert_eq!(tracker.push(i64::MIN), Some(0.));
    }

    #[test]
    fn window_stays_exact_through_duplicates() {
        let mut tracker = WindowTracker::new(4).unwrap();
        tracker.extend([1, 1, 1, 1, 2, 3, 2]);

        assert_eq!(tracker.push(1), Some(2.));
        assert_eq!(tracker.structure().len(), 4);
        assert!(tracker.structure().pending_deletions() <= 4);
    }

    #[test]
    fn alternative_structures() {
        let stream = [9.5, -1.0, 3.25, 3.25, 0.0, 12.0, -7.5];

        let mut heap = WindowTracker::with_structure(4, Structure::DualHeap).unwrap();
        let mut tree = WindowTracker::with_structure(4, Structure::SortedMultiset).unwrap();
        let mut generic =
            WindowTracker::with_backend(4, SortedMultiset::<f64>::new()).unwrap();

        for v in stream {
            let expected = heap.push(v);
            assert_eq!(tree.push(v), expected);
            assert_eq!(generic.push(v), expected);
        }
        assert_eq!(heap.structure().structure(), Structure::DualHeap);
    }

    #[test]
    fn nan_is_ordered_not_rejected() {
        let mut tracker = WindowTracker::new(3).unwrap();
        tracker.push(1.0_f64);
        tracker.push(f64::NAN);

        // NaN sorts above every number, so the median is still the middle number
        assert_eq!(tracker.push(2.0), Some(2.));
        assert_eq!(tracker.push(0.5), Some(2.));
        assert_eq!(tracker.push(0.0), Some(0.5));
    }
}
