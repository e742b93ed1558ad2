//! Verlet point masses: implicit velocity, mobility weight and an optional pin.

use crate::constraint::{Constraint, ConstraintKind};
use crate::float::Float;
use crate::system::PointId;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// A simulated particle of the rope.
///
/// `weight` is mobility, not mass: 0 never moves, 1 is fully free. It is the
/// share of every constraint correction this point absorbs and it scales the
/// gravity the point feels.
#[derive(Clone, Debug)]
pub struct PointMass<F: Float> {
    pub position: Vec2<F>,
    pub previous_position: Vec2<F>,
    pub weight: F,
    pub pin: Option<Vec2<F>>,
    pub constraints: AllocVec<Constraint<F>>,
}

impl<F: Float> PointMass<F> {
    pub fn new(position: Vec2<F>, weight: F) -> Self {
        PointMass {
            position,
            previous_position: position,
            weight,
            pin: None,
            constraints: AllocVec::new(),
        }
    }

    /// A point fixed at `position`.
    pub fn pinned(position: Vec2<F>, weight: F) -> Self {
        let mut p = Self::new(position, weight);
        p.pin = Some(position);
        p
    }

    /// Advance one frame. Pinned points snap to their pin and skip physics.
    pub fn update(&mut self, delta: F, gravity: Vec2<F>) {
        if let Some(pin) = self.pin {
            self.previous_position = self.position;
            self.position = pin;
            return;
        }
        let velocity = self.position - self.previous_position;
        self.previous_position = self.position;
        self.position = self.position + velocity + gravity.scale(self.weight * delta * delta);
    }

    /// Share of a correction this point accepts. Pinned points accept none.
    pub fn mobility(&self) -> F {
        if self.pin.is_some() { F::zero() } else { self.weight }
    }

    /// Per-frame displacement.
    pub fn velocity(&self) -> Vec2<F> {
        self.position - self.previous_position
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    /// Pin to `position`. The point moves there on its next update.
    pub fn pin_to(&mut self, position: Vec2<F>) {
        self.pin = Some(position);
    }

    pub fn unpin(&mut self) {
        self.pin = None;
    }

    pub fn add_constraint(&mut self, other: PointId, rest_length: F, kind: ConstraintKind) {
        self.constraints.push(Constraint::new(other, rest_length, kind));
    }

    /// Remove the first constraint of `kind` targeting `other`.
    pub fn remove_constraint(&mut self, other: PointId, kind: ConstraintKind) -> Option<Constraint<F>> {
        let pos = self
            .constraints
            .iter()
            .position(|c| c.other == other && c.kind == kind)?;
        Some(self.constraints.remove(pos))
    }

    /// Point the exact constraint on `old` at `new` with a new rest length.
    /// Returns false if there was no such constraint.
    pub fn retarget(&mut self, old: PointId, new: PointId, rest_length: F) -> bool {
        match self.exact_mut(old) {
            Some(c) => {
                c.other = new;
                c.rest_length = rest_length;
                true
            }
            None => false,
        }
    }

    /// Rest length of the exact constraint to `other`.
    pub fn rest_length_to(&self, other: PointId) -> Option<F> {
        self.constraints
            .iter()
            .find(|c| c.other == other && c.is_exact())
            .map(|c| c.rest_length)
    }

    pub fn set_rest_length(&mut self, other: PointId, rest_length: F) -> bool {
        match self.exact_mut(other) {
            Some(c) => {
                c.rest_length = rest_length;
                true
            }
            None => false,
        }
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    fn exact_mut(&mut self, other: PointId) -> Option<&mut Constraint<F>> {
        self.constraints
            .iter_mut()
            .find(|c| c.other == other && c.is_exact())
    }
}
