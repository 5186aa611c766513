#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod config;
mod dual_heap;
mod error;
mod multiset;
mod sample;
mod structure;
mod window;

pub use config::TrackerConfig;
pub use dual_heap::DualHeap;
pub use error::{Result, WindowError};
pub use multiset::SortedMultiset;
pub use sample::Sample;
pub use structure::{Backend, OrderStatistic, Structure};
pub use window::{TrackerState, WindowTracker};

/// Medians of every full window of `window_size` values in `stream`, in stream order
///
/// The result holds `stream.len() - window_size + 1` medians.
/// All validation happens before any processing:
/// the window must be positive and no wider than the stream, the stream must not be empty,
/// and it must not contain NaN.
pub fn process<T: Sample>(stream: &[T], window_size: usize) -> Result<Vec<f64>> {
    process_with(stream, window_size, Structure::default())
}

/// Same as [`process`], with an explicit choice of [`Structure`]
pub fn process_with<T: Sample>(
    stream: &[T],
    window_size: usize,
    structure: Structure,
) -> Result<Vec<f64>> {
    validate_batch(stream, window_size)?;

    #[cfg(feature = "log")]
    log::debug!(
        "Computing {} sliding medians over {} values with {:?}",
        stream.len() - window_size + 1,
        stream.len(),
        structure
    );

    let mut tracker = TrackerConfig::new(window_size)
        .structure(structure)
        .build::<T>()?;

    let mut medians = Vec::with_capacity(stream.len() - window_size + 1);
    medians.extend(stream.iter().filter_map(|v| tracker.push(*v)));
    Ok(medians)
}

fn validate_batch<T: Sample>(stream: &[T], window_size: usize) -> Result<()> {
    if window_size == 0 {
        return Err(WindowError::InvalidWindowSize {
            window: window_size,
        });
    }
    if stream.is_empty() {
        return Err(WindowError::EmptySequence);
    }
    if window_size > stream.len() {
        return Err(WindowError::WindowTooLarge {
            window: window_size,
            len: stream.len(),
        });
    }
    if let Some(index) = stream.iter().position(Sample::is_nan) {
        return Err(WindowError::NonFiniteValue { index });
    }
    Ok(())
}

/// Lazy sliding medians over any iterator
///
/// Yields one median per full window, pulling input only as needed,
/// so it also works on unbounded streams.
#[derive(Debug, Clone)]
pub struct SlidingMedians<I, T: Sample> {
    inner: I,
    tracker: WindowTracker<T>,
}

impl<I: Iterator<Item = T>, T: Sample> Iterator for SlidingMedians<I, T> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let value = self.inner.next()?;
            if let Some(median) = self.tracker.push(value) {
                return Some(median);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let missing = (self.tracker.window_size() - 1).saturating_sub(self.tracker.len());
        let (lower, upper) = self.inner.size_hint();
        (
            lower.saturating_sub(missing),
            upper.map(|upper| upper.saturating_sub(missing)),
        )
    }
}

/// Extension trait adding [`MedianExt::sliding_medians`] to every iterable of [`Sample`]s
pub trait MedianExt<T: Sample>: IntoIterator<Item = T> + Sized {
    /// Lazily computes the median of every full window of `window_size` values
    ///
    /// Fails with [`WindowError::InvalidWindowSize`] if `window_size` is zero.
    fn sliding_medians(self, window_size: usize) -> Result<SlidingMedians<Self::IntoIter, T>> {
        Ok(SlidingMedians {
            inner: self.into_iter(),
            tracker: WindowTracker::new(window_size)?,
        })
    }
}

impl<T: Sample, I: IntoIterator<Item = T>> MedianExt<T> for I {}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::tests::naive;
    use super::{process, process_with, Structure, WindowTracker};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn dual_heap_matches_naive(
            stream in proptest::collection::vec(-20_i32..20, 1..120),
            window_seed in any::<usize>(),
        ) {
            let window_size = window_seed % stream.len() + 1;
            let medians = process_with(&stream, window_size, Structure::DualHeap).unwrap();
            prop_assert_eq!(medians, naive(&stream, window_size));
        }

        #[test]
        fn sorted_multiset_matches_naive(
            stream in proptest::collection::vec(-20_i32..20, 1..120),
            window_seed in any::<usize>(),
        ) {
            let window_size = window_seed % stream.len() + 1;
            let medians = process_with(&stream, window_size, Structure::SortedMultiset).unwrap();
            prop_assert_eq!(medians, naive(&stream, window_size));
        }

        #[test]
        fn float_streams_match_naive(
            stream in proptest::collection::vec(-1e6_f64..1e6, 1..80),
            window_seed in any::<usize>(),
        ) {
            let window_size = window_seed % stream.len() + 1;
            prop_assert_eq!(process(&stream, window_size).unwrap(), naive(&stream, window_size));
        }

        #[test]
        fn halves_stay_balanced(
            stream in proptest::collection::vec(0_u8..6, 1..100),
            window_size in 1_usize..12,
        ) {
            let mut tracker = WindowTracker::new(window_size).unwrap();
            for v in stream {
                tracker.push(v);
                let mut window: Vec<u8> = tracker.window().collect();
                window.sort_unstable();

                let heap = tracker.structure();
                prop_assert_eq!(heap.len(), tracker.len());
                prop_assert_eq!(heap.sorted_values(), window.clone());
                if tracker.is_full() {
                    prop_assert!(heap.low_len() >= heap.high_len());
                    prop_assert!(heap.low_len() <= heap.high_len() + 1);

                    // The lower half holds exactly the low_len smallest values of the window
                    let mut heap = heap.clone();
                    let (lo, hi) = heap.tops();
                    prop_assert_eq!(lo, Some(window[heap.low_len() - 1]));
                    prop_assert_eq!(hi, window.get(heap.low_len()).copied());
                }
            }
        }
    }
}
