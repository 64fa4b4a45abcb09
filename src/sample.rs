use std::cmp::Ordering;
use std::fmt::Debug;

/// A numeric value that can be stored in an [`IndexedHeap`](crate::heap::IndexedHeap).
///
/// Floats are ordered with `total_cmp`, so every sample has a definite place in
/// the heap even when it is NaN. Equality is numeric, so `-0.0` equals `0.0`
/// although `total_cmp` places it first.
pub trait Sample: Copy + Debug {
    fn total_cmp(&self, other: &Self) -> Ordering;

    fn num_eq(&self, other: &Self) -> bool;

    /// Exact only up to 2^53 in magnitude for 64 bit integers.
    fn to_f64(self) -> f64;

    /// Lossless widening for integers, `None` for floats.
    fn to_i128(self) -> Option<i128>;
}

macro_rules! impl_sample_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }

                #[inline]
                fn num_eq(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn to_i128(self) -> Option<i128> {
                    Some(self as i128)
                }
            }
        )*
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    <$t>::total_cmp(self, other)
                }

                #[inline]
                fn num_eq(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn to_i128(self) -> Option<i128> {
                    None
                }
            }
        )*
    };
}

impl_sample_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_sample_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_order_is_total() {
        assert_eq!(Sample::total_cmp(&1.0_f64, &2.0), Ordering::Less);
        assert_eq!(Sample::total_cmp(&f64::NAN, &f64::INFINITY), Ordering::Greater);
        assert_eq!(Sample::total_cmp(&3.5_f32, &3.5), Ordering::Equal);
    }

    #[test]
    fn test_signed_zero_is_equal() {
        assert!(Sample::num_eq(&-0.0_f64, &0.0));
        assert_eq!(Sample::total_cmp(&-0.0_f64, &0.0), Ordering::Less);
        assert!(!Sample::num_eq(&f32::NAN, &f32::NAN));
    }

    #[test]
    fn test_int_widening() {
        assert_eq!(u64::MAX.to_i128(), Some(u64::MAX as i128));
        assert_eq!(1.5_f64.to_i128(), None);
    }

    #[test]
    fn test_int_to_f64() {
        assert_eq!((-7_i64).to_f64(), -7.0);
        assert_eq!(200_u8.to_f64(), 200.0);
    }
}
