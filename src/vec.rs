//! 2D vectors for rope positions.

use crate::float::Float;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A point position, placement offset or gravity vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    pub fn new(x: F, y: F) -> Self {
        Vec2 { x, y }
    }

    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    pub fn scale(self, s: F) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    pub fn distance(self, other: Self) -> F {
        (other - self).length()
    }

    /// Unit vector from `self` toward `other`, or `None` when they coincide.
    pub fn direction_to(self, other: Self) -> Option<Self> {
        let d = other - self;
        let len = d.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            None
        } else {
            Some(d.scale(F::one() / len))
        }
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
