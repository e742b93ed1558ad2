//! Length constraints between point masses.

use crate::float::Float;
use crate::system::PointId;

/// How a constraint reacts to the current distance between its endpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Rod: pulls or pushes toward the rest length.
    Exact,
    /// Slack cap: only pulls, and only once the rest length is exceeded.
    AtMost,
}

/// A length relation from the owning point to `other`.
///
/// Constraints live on the point that owns them, so a chain link is stored
/// once, on the later point, targeting its predecessor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Constraint<F: Float> {
    pub other: PointId,
    pub rest_length: F,
    pub kind: ConstraintKind,
}

impl<F: Float> Constraint<F> {
    pub fn new(other: PointId, rest_length: F, kind: ConstraintKind) -> Self {
        Constraint { other, rest_length, kind }
    }

    pub fn exact(other: PointId, rest_length: F) -> Self {
        Self::new(other, rest_length, ConstraintKind::Exact)
    }

    pub fn at_most(other: PointId, rest_length: F) -> Self {
        Self::new(other, rest_length, ConstraintKind::AtMost)
    }

    pub fn is_exact(&self) -> bool {
        self.kind == ConstraintKind::Exact
    }

    /// Signed length error for a given current distance, or `None` when the
    /// constraint is slack and needs no correction.
    pub fn error(&self, distance: F) -> Option<F> {
        match self.kind {
            ConstraintKind::AtMost if distance <= self.rest_length => None,
            _ => Some(distance - self.rest_length),
        }
    }
}
