//! Scalar abstraction so ropes run on `f32` or `f64`.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// The scalar a rope is simulated in.
///
/// Backed by `libm` so the crate stays `no_std`.
pub trait Float:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + core::fmt::Debug
    + core::fmt::Display
{
    fn zero() -> Self;
    fn one() -> Self;
    fn two() -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn ceil(self) -> Self;
    /// Lossy for `f64` only in the sense that the constant was an `f32`.
    fn from_f32(v: f32) -> Self;
    /// Point and segment counts.
    fn from_usize(v: usize) -> Self;
    fn is_finite(self) -> bool;

    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Clamp to `[lo, hi]`.
    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }
}

macro_rules! impl_float {
    ($t:ty, $sqrt:path, $abs:path, $ceil:path) => {
        impl Float for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn two() -> Self { 2.0 }
            fn sqrt(self) -> Self { $sqrt(self) }
            fn abs(self) -> Self { $abs(self) }
            fn ceil(self) -> Self { $ceil(self) }
            fn from_f32(v: f32) -> Self { v as $t }
            fn from_usize(v: usize) -> Self { v as $t }
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
        }
    };
}

impl_float!(f32, libm::sqrtf, libm::fabsf, libm::ceilf);
impl_float!(f64, libm::sqrt, libm::fabs, libm::ceil);
