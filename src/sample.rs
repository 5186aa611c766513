use std::cmp::Ordering;
use std::fmt::Debug;

/// A numeric value that can flow through a sliding-window median
///
/// Implementors must provide a total order (so duplicates and deletions can be matched by value)
/// and a widening conversion to [`f64`], which is the type every median is reported in.
///
/// The trait is implemented for all primitive integers, and for [`f32`] and [`f64`].
/// Floats are ordered by IEEE total order (see [`f64::total_cmp`]), so `-0.0 < 0.0`,
/// and NaN takes a fixed position at the ends of the order instead of poisoning comparisons.
pub trait Sample: Copy + Debug {
    /// Total ordering between two samples
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Widens the sample into the median result type
    fn to_f64(self) -> f64;

    /// Whether the sample is a NaN
    ///
    /// Always `false` for integers.
    fn is_nan(&self) -> bool {
        false
    }
}

macro_rules! impl_sample_for_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Sample for f32 {
    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn is_nan(&self) -> bool {
        f32::is_nan(*self)
    }
}

impl Sample for f64 {
    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn is_nan(&self) -> bool {
        f64::is_nan(*self)
    }
}

/// Wrapper giving any [`Sample`] an [`Ord`] implementation, so it can key heaps and maps
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ordered<T>(pub(crate) T);

impl<T: Sample> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl<T: Sample> Eq for Ordered<T> {}

impl<T: Sample> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Sample> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Midpoint of two widened samples
///
/// `(lo + hi) / 2` is correctly rounded whenever the sum is finite.
/// Halving first is only used when the sum overflows.
#[inline]
pub(crate) fn midpoint(lo: f64, hi: f64) -> f64 {
    let sum = lo + hi;
    if sum.is_finite() {
        sum / 2.
    } else {
        lo / 2. + hi / 2.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_total_order() {
        assert!(Ordered(-0.0_f64) < Ordered(0.0_f64));
        assert!(Ordered(f64::INFINITY) < Ordered(f64::NAN));
        assert_eq!(Ordered(1.5_f32), Ordered(1.5_f32));
    }

    #[test]
    fn int_widening() {
        assert_eq!((-3_i32).to_f64(), -3.);
        assert_eq!(u64::MAX.to_f64(), u64::MAX as f64);
        assert!(!7_u8.is_nan());
    }

    #[test]
    fn nan_detection() {
        assert!(f32::NAN.is_nan());
        assert!(Sample::is_nan(&f64::NAN));
        assert!(!Sample::is_nan(&1.0_f64));
    }

    #[test]
    fn midpoint_does_not_overflow() {
        assert_eq!(midpoint(f64::MAX, f64::MAX), f64::MAX);
        assert_eq!(midpoint(-f64::MAX, f64::MAX), 0.);
        assert_eq!(midpoint(1., 2.), 1.5);
        assert_eq!(midpoint(-3., -1.), -2.);
    }

    #[test]
    fn midpoint_is_correctly_rounded() {
        assert_eq!(midpoint(0.1, 0.7), (0.1 + 0.7) / 2.);
        assert_eq!(midpoint(0.1, 0.7), 0.399_999_999_999_999_97);
        assert_eq!(
            midpoint(93.320962888666, 28.536831483350152),
            (93.320962888666 + 28.536831483350152) / 2.
        );
    }
}
