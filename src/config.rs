//! Rope tuning and per-frame simulation context.

use crate::error::{Result, RopeError};
use crate::float::Float;
use crate::vec::Vec2;

/// Tuning for a [`Rope`](crate::rope::Rope).
///
/// # Builder Pattern
/// ```
/// use tether::config::RopeConfig;
///
/// let config: RopeConfig<f32> = RopeConfig::new()
///     .with_segment_rest_length(30.0)
///     .with_relaxation_iterations(30)
///     .with_cut_fade_time(1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RopeConfig<F: Float> {
    /// Target length of every interior segment. Default: 20.
    pub segment_rest_length: F,
    /// Relaxation passes per frame. Default: 25.
    pub relaxation_iterations: usize,
    /// Weight of the anchor and of points added by `extend`. Default: 0.5.
    pub point_weight: F,
    /// Weight of non-tail points after `reinforce`. Default: 0.9.
    pub stiffened_weight: F,
    /// Near-zero weight for frozen points after a cut. Default: 1e-5.
    pub frozen_weight: F,
    /// Extra length per segment allowed by reinforcement caps. Default: 3.
    pub reinforce_slack: F,
    /// Shortest final segment `retract` will leave behind. Default: 1.
    pub min_segment_length: F,
    /// Seconds between a cut and removal of the anchor side. Default: 1.95.
    pub cut_fade_time: F,
}

impl<F: Float> RopeConfig<F> {
    pub fn new() -> Self {
        RopeConfig {
            segment_rest_length: F::from_f32(20.0),
            relaxation_iterations: 25,
            point_weight: F::from_f32(0.5),
            stiffened_weight: F::from_f32(0.9),
            frozen_weight: F::from_f32(1e-5),
            reinforce_slack: F::from_f32(3.0),
            min_segment_length: F::one(),
            cut_fade_time: F::from_f32(1.95),
        }
    }

    pub fn with_segment_rest_length(mut self, length: F) -> Self {
        self.segment_rest_length = length;
        self
    }

    pub fn with_relaxation_iterations(mut self, iterations: usize) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    pub fn with_point_weight(mut self, weight: F) -> Self {
        self.point_weight = weight;
        self
    }

    pub fn with_stiffened_weight(mut self, weight: F) -> Self {
        self.stiffened_weight = weight;
        self
    }

    pub fn with_frozen_weight(mut self, weight: F) -> Self {
        self.frozen_weight = weight;
        self
    }

    pub fn with_reinforce_slack(mut self, slack: F) -> Self {
        self.reinforce_slack = slack;
        self
    }

    pub fn with_min_segment_length(mut self, length: F) -> Self {
        self.min_segment_length = length;
        self
    }

    pub fn with_cut_fade_time(mut self, seconds: F) -> Self {
        self.cut_fade_time = seconds;
        self
    }

    /// Check the values topology edits rely on.
    pub fn validate(&self) -> Result<()> {
        let seg = self.segment_rest_length;
        if !seg.is_finite() || seg <= F::zero() {
            return Err(RopeError::InvalidSegmentLength);
        }
        let floor = self.min_segment_length;
        if !floor.is_finite() || floor <= F::zero() || floor >= seg {
            return Err(RopeError::InvalidSegmentLength);
        }
        if self.relaxation_iterations == 0 {
            return Err(RopeError::InvalidIterations);
        }
        for w in [self.point_weight, self.stiffened_weight, self.frozen_weight] {
            if !w.is_finite() || w < F::zero() || w > F::one() {
                return Err(RopeError::InvalidWeight);
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for RopeConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ambient forces for one frame, passed into every update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepContext<F: Float> {
    /// Gravity acceleration. Default: zero (no gravity).
    pub gravity: Vec2<F>,
}

impl<F: Float> StepContext<F> {
    pub fn new() -> Self {
        StepContext { gravity: Vec2::zero() }
    }

    /// Screen-space gravity (y grows downward), in units per second squared.
    pub fn earth_like() -> Self {
        Self::new().with_gravity(Vec2::new(F::zero(), F::from_f32(784.0)))
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }
}

impl<F: Float> Default for StepContext<F> {
    fn default() -> Self {
        Self::new()
    }
}
