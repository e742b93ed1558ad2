//! Error types for rope construction and topology edits.

use thiserror::Error;

/// Result alias for rope operations.
pub type Result<T> = core::result::Result<T, RopeError>;

/// Errors reported at the rope's boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RopeError {
    /// Segment rest length must be positive and finite, and larger than the
    /// minimum segment length.
    #[error("segment rest length must be positive, finite and above the minimum segment length")]
    InvalidSegmentLength,
    /// Initial rope length must be positive and finite.
    #[error("rope length must be positive and finite")]
    InvalidLength,
    /// At least one relaxation pass is required.
    #[error("relaxation iterations must be at least 1")]
    InvalidIterations,
    /// Weights must lie in [0, 1].
    #[error("point weights must be in [0, 1]")]
    InvalidWeight,
    /// Point index is out of bounds.
    #[error("point index {index} out of bounds (count: {count})")]
    PointOutOfBounds { index: usize, count: usize },
    /// The rope has already been cut.
    #[error("rope has already been cut")]
    AlreadyCut,
}
