//! Scalar operation sets: sum, max, min, survival product

use std::fmt;
use std::marker::PhantomData;
use std::ops::Add;

use super::ScanOps;

/// Numeric types with a lowest and highest value.
///
/// Used as the identity of [`Max`] and [`Min`]. Floats use the infinities so
/// that every finite value wins against the identity.
pub trait Bounded: Copy + PartialOrd + Send + Sync {
    /// Smallest representable value
    const LOWEST: Self;
    /// Largest representable value
    const HIGHEST: Self;
}

macro_rules! impl_bounded_int {
    ($($t:ty),*) => {
        $(impl Bounded for $t {
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;
        })*
    };
}

impl_bounded_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Bounded for f32 {
    const LOWEST: Self = f32::NEG_INFINITY;
    const HIGHEST: Self = f32::INFINITY;
}

impl Bounded for f64 {
    const LOWEST: Self = f64::NEG_INFINITY;
    const HIGHEST: Self = f64::INFINITY;
}

/// Classic sum: identity `T::default()`, combine `+`
pub struct Sum<T> {
    _elem: PhantomData<fn() -> T>,
}

/// Running maximum: identity is the lowest value of `T`
pub struct Max<T> {
    _elem: PhantomData<fn() -> T>,
}

/// Running minimum: identity is the highest value of `T`
pub struct Min<T> {
    _elem: PhantomData<fn() -> T>,
}

macro_rules! marker_ops {
    ($($name:ident),*) => {
        $(
            impl<T> $name<T> {
                /// Create the operation set
                pub fn new() -> Self {
                    Self { _elem: PhantomData }
                }
            }

            impl<T> Default for $name<T> {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<T> Clone for $name<T> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for $name<T> {}

            impl<T> fmt::Debug for $name<T> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}<{}>", stringify!($name), std::any::type_name::<T>())
                }
            }
        )*
    };
}

marker_ops!(Sum, Max, Min);

impl<T> ScanOps for Sum<T>
where
    T: Copy + Default + Add<Output = T> + Send + Sync,
{
    type Elem = T;
    type Tally = T;
    type Output = T;

    fn identity(&self) -> T {
        T::default()
    }

    fn prepare(&self, elem: &T) -> T {
        *elem
    }

    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }

    fn gen(&self, tally: &T) -> T {
        *tally
    }
}

impl<T: Bounded> ScanOps for Max<T> {
    type Elem = T;
    type Tally = T;
    type Output = T;

    fn identity(&self) -> T {
        T::LOWEST
    }

    fn prepare(&self, elem: &T) -> T {
        *elem
    }

    fn combine(&self, left: &T, right: &T) -> T {
        if *left > *right {
            *left
        } else {
            *right
        }
    }

    fn gen(&self, tally: &T) -> T {
        *tally
    }
}

impl<T: Bounded> ScanOps for Min<T> {
    type Elem = T;
    type Tally = T;
    type Output = T;

    fn identity(&self) -> T {
        T::HIGHEST
    }

    fn prepare(&self, elem: &T) -> T {
        *elem
    }

    fn combine(&self, left: &T, right: &T) -> T {
        if *left < *right {
            *left
        } else {
            *right
        }
    }

    fn gen(&self, tally: &T) -> T {
        *tally
    }
}

/// Probability that no event has happened yet.
///
/// Elements are independent miss probabilities `p`; the tally is the
/// product of `1 - p`, so a prefix result is the chance of getting that far
/// without a single miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct Survival;

impl ScanOps for Survival {
    type Elem = f64;
    type Tally = f64;
    type Output = f64;

    fn identity(&self) -> f64 {
        1.0
    }

    fn prepare(&self, probability_of_miss: &f64) -> f64 {
        1.0 - probability_of_miss
    }

    fn combine(&self, left: &f64, right: &f64) -> f64 {
        left * right
    }

    fn gen(&self, tally: &f64) -> f64 {
        *tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::laws::assert_laws;

    #[test]
    fn test_sum_laws() {
        assert_laws(&Sum::<i64>::new(), &[-3, 0, 7, 100]);
    }

    #[test]
    fn test_max_min_laws() {
        assert_laws(&Max::<i32>::new(), &[i32::MIN, -1, 0, 9]);
        assert_laws(&Min::<u8>::new(), &[0, 1, 255]);
        assert_laws(&Max::<f64>::new(), &[-1.5, 0.0, 2.25]);
    }

    #[test]
    fn test_float_identity_loses_to_any_value() {
        let max = Max::<f64>::new();
        assert_eq!(max.combine(&max.identity(), &f64::MIN), f64::MIN);
        let min = Min::<f64>::new();
        assert_eq!(min.combine(&min.identity(), &f64::MAX), f64::MAX);
    }

    #[test]
    fn test_survival_product() {
        let ops = Survival;
        let t = ops.combine(&ops.prepare(&0.5), &ops.prepare(&0.5));
        assert!((ops.gen(&t) - 0.25).abs() < 1e-12);
        assert_eq!(ops.combine(&ops.identity(), &ops.prepare(&0.1)), 0.9);
    }

    #[test]
    fn test_debug_names_element_type() {
        assert_eq!(format!("{:?}", Sum::<i64>::new()), "Sum<i64>");
    }
}
