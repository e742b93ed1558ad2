//! Cuttable rope: a chain of point masses from an anchor to a payload tail.
//!
//! ```text
//! anchor ●───●───●───●──● tail
//!        0   1   2   3  4
//!            seg seg seg  remainder
//! ```
//!
//! Every point after the anchor owns one exact constraint to its
//! predecessor. Interior links are exactly `segment_rest_length` long; the
//! link owned by the tail absorbs whatever length is not a whole segment.
//! Winding in and out inserts or removes the point next to the tail and
//! retargets the tail's link, so the rest of the chain is never touched.
//!
//! A cut splices a frozen stand-in into the chain. The anchor side stays in
//! the same container, frozen, until its fade runs out; the tail side hangs
//! from the stand-in. One solver pass still covers both pieces.

use crate::config::{RopeConfig, StepContext};
use crate::constraint::ConstraintKind;
use crate::error::{Result, RopeError};
use crate::fade::CutFade;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::point::PointMass;
use crate::solver;
use crate::system::{ConstraintSystem, PointId};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;
use tracing::{debug, info, warn};

/// Lifecycle of a rope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RopeState {
    /// Whole and simulating.
    Attached,
    /// Cut; the anchor side is frozen and fading out.
    Cutting,
    /// The anchor side has been dropped from the chain.
    Severed,
}

#[derive(Clone, Debug)]
struct CutState<F: Float> {
    index: usize,
    /// `None` when the cut was at the tail, which has no successor to hang.
    stand_in: Option<PointId>,
    fade: CutFade<F>,
}

/// A rope simulated as a chain of Verlet point masses.
///
/// The tail belongs to the payload the rope holds: the rope never
/// integrates it, only pulls on it through its link. Owners push the
/// payload position in with [`Rope::set_tail_position`] and read it back
/// after [`Rope::update`].
#[derive(Clone, Debug)]
pub struct Rope<F: Float> {
    system: ConstraintSystem<F>,
    anchor: PointId,
    tail: PointId,
    config: RopeConfig<F>,
    state: RopeState,
    cut: Option<CutState<F>>,
    reinforced: bool,
}

impl<F: Float> Rope<F> {
    /// Build a rope of `initial_length` between two new points.
    ///
    /// Interior points are laid out evenly on the straight line from
    /// `anchor_pos` to `tail_pos`.
    pub fn new(anchor_pos: Vec2<F>, tail_pos: Vec2<F>, initial_length: F, config: RopeConfig<F>) -> Result<Self> {
        let anchor = PointMass::new(anchor_pos, config.point_weight);
        let tail = PointMass::new(tail_pos, F::one());
        Self::with_points(anchor, tail, initial_length, config)
    }

    /// Build a rope between existing points, such as a pinned anchor shared
    /// with a level object. Their weights are reset and their constraints
    /// dropped; pins are kept.
    pub fn with_points(
        mut anchor: PointMass<F>,
        mut tail: PointMass<F>,
        initial_length: F,
        config: RopeConfig<F>,
    ) -> Result<Self> {
        config.validate()?;
        if !initial_length.is_finite() || initial_length <= F::zero() {
            return Err(RopeError::InvalidLength);
        }

        let seg = config.segment_rest_length;
        let segments = (initial_length / seg).ceil().max(F::one());
        let offset = (tail.position - anchor.position).scale(F::one() / segments);

        anchor.weight = config.point_weight;
        anchor.clear_constraints();
        tail.weight = F::one();
        tail.clear_constraints();

        let mut system = ConstraintSystem::with_capacity(2);
        let anchor_id = system.push(anchor);
        let first = initial_length.min(seg);
        tail.add_constraint(anchor_id, first, ConstraintKind::Exact);
        let tail_id = system.push(tail);

        let mut rope = Rope {
            system,
            anchor: anchor_id,
            tail: tail_id,
            config,
            state: RopeState::Attached,
            cut: None,
            reinforced: false,
        };
        rope.extend(initial_length - first, offset);

        debug!(points = rope.len(), length = ?initial_length, "rope created");
        Ok(rope)
    }

    /// Lengthen the rope by `length`.
    ///
    /// Whole segments are inserted next to the tail at the neighbour's
    /// position plus `offset`; a fractional remainder grows the tail's link,
    /// spilling into one more segment once the excess over a full segment
    /// is at least `min_segment_length`.
    pub fn extend(&mut self, length: F, offset: Vec2<F>) {
        if !(length > F::zero()) {
            return;
        }
        if !length.is_finite() {
            warn!(length = ?length, "extend ignored: length is not finite");
            return;
        }
        let Some(mut tail_rest) = self.tail_rest_length() else {
            warn!("extend ignored: tail has no link");
            return;
        };
        let seg = self.config.segment_rest_length;
        let floor = self.config.min_segment_length;
        let mut remaining = length;
        let mut inserted = 0usize;

        while remaining > F::zero() {
            if remaining >= seg {
                let next = remaining - seg;
                if !(next < remaining) {
                    warn!(remaining = ?remaining, "extend stopped: length too large for the scalar type");
                    break;
                }
                self.insert_before_tail(offset, tail_rest);
                inserted += 1;
                remaining = next;
            } else {
                let grown = tail_rest + remaining;
                // Only spill when the leftover is itself a usable segment.
                if grown - seg >= floor {
                    tail_rest = grown - seg;
                    remaining = seg;
                } else {
                    self.set_tail_rest(grown);
                    remaining = F::zero();
                }
            }
        }

        self.refresh_tail_caps();
        debug!(inserted, points = self.len(), length = ?length, "rope extended");
    }

    /// Shorten the rope by `amount`. Returns the part that could not be
    /// retracted because the active chain ran out of interior points.
    pub fn retract(&mut self, amount: F) -> F {
        if !(amount > F::zero()) {
            return F::zero();
        }
        if !amount.is_finite() {
            warn!(amount = ?amount, "retract ignored: amount is not finite");
            return amount;
        }
        let Some(tail_rest) = self.tail_rest_length() else {
            warn!("retract ignored: tail has no link");
            return amount;
        };
        let seg = self.config.segment_rest_length;
        let floor = self.config.min_segment_length;
        let mut remaining = amount;
        let mut removed = 0usize;

        while remaining > F::zero() {
            let removable = self.can_remove_before_tail();
            if remaining >= seg && removable {
                self.remove_before_tail(tail_rest);
                removed += 1;
                remaining = remaining - seg;
            } else {
                let shrunk = tail_rest - remaining;
                if shrunk >= floor {
                    self.set_tail_rest(shrunk);
                    remaining = F::zero();
                } else if removable {
                    // Fold the neighbour's segment into the tail link rather
                    // than leave a near-zero one.
                    self.remove_before_tail((seg + shrunk).max(floor));
                    removed += 1;
                    remaining = F::zero();
                } else {
                    let clamped = tail_rest.min(floor);
                    remaining = remaining - (tail_rest - clamped);
                    self.set_tail_rest(clamped);
                    break;
                }
            }
        }

        self.refresh_tail_caps();
        if remaining > F::zero() {
            warn!(leftover = ?remaining, "rope too short to retract further");
        }
        debug!(removed, points = self.len(), amount = ?amount, "rope retracted");
        remaining
    }

    /// Stiffen the rope and cap how far each point may drift from the
    /// anchor. Only applies to an attached rope with a pinned anchor, once.
    /// Returns whether anything changed.
    pub fn reinforce(&mut self) -> bool {
        if self.state != RopeState::Attached {
            warn!(state = ?self.state, "reinforce ignored: rope is cut");
            return false;
        }
        if self.reinforced || !self.anchor().is_pinned() {
            return false;
        }

        let stiffened = self.config.stiffened_weight;
        let anchor = self.anchor;
        let tail = self.tail;
        for i in 0..self.system.len() {
            let cap = self.cap_for(i);
            let Some(id) = self.system.id_at(i) else { continue };
            let p = &mut self.system[id];
            if id != tail {
                p.weight = stiffened;
            }
            if i > 0 {
                p.add_constraint(anchor, cap, ConstraintKind::AtMost);
            }
        }
        self.reinforced = true;

        debug!(points = self.len(), "rope reinforced");
        true
    }

    /// Cut the chain after the point at `index`.
    ///
    /// Points up to `index` keep their constraints but freeze. A frozen
    /// stand-in takes the successor's place as the end the tail side hangs
    /// from. Cutting at the tail just detaches it.
    pub fn cut(&mut self, index: usize) -> Result<()> {
        if self.state != RopeState::Attached {
            return Err(RopeError::AlreadyCut);
        }
        let count = self.system.len();
        if index >= count {
            return Err(RopeError::PointOutOfBounds { index, count });
        }

        let frozen = self.config.frozen_weight;
        let stand_in = if index + 1 == count {
            self.system[self.tail].clear_constraints();
            None
        } else {
            let (Some(cut_id), Some(next_id)) = (self.system.id_at(index), self.system.id_at(index + 1)) else {
                return Err(RopeError::PointOutOfBounds { index, count });
            };
            let next = &mut self.system[next_id];
            let rest = next
                .remove_constraint(cut_id, ConstraintKind::Exact)
                .map_or(self.config.segment_rest_length, |c| c.rest_length);
            let mut stand = PointMass::new(next.position, frozen);
            stand.previous_position = next.previous_position;

            let stand_id = self.system.insert_at(stand, index + 1);
            self.system[next_id].add_constraint(stand_id, rest, ConstraintKind::Exact);
            // Reinforcement caps all target the anchor, across the cut.
            for i in (index + 2)..self.system.len() {
                if let Some(p) = self.system.point_at_mut(i) {
                    p.constraints.retain(|c| c.kind != ConstraintKind::AtMost);
                }
            }
            Some(stand_id)
        };

        let tail = self.tail;
        for i in 0..=index {
            let Some(id) = self.system.id_at(i) else { continue };
            if id != tail {
                self.system[id].weight = frozen;
            }
        }

        self.reinforced = false;
        self.state = RopeState::Cutting;
        self.cut = Some(CutState {
            index,
            stand_in,
            fade: CutFade::new(self.config.cut_fade_time),
        });

        debug!(index, points = self.len(), "rope cut");
        Ok(())
    }

    /// Advance the rope by one frame.
    ///
    /// Ticks the cut fade (dropping the dead side when it ends), integrates
    /// every point except the tail, then relaxes the whole chain.
    pub fn update<O: StepObserver>(&mut self, delta: F, ctx: &StepContext<F>, observer: &mut O) {
        self.advance_cut(delta, observer);

        let tail = self.tail;
        for i in 0..self.system.len() {
            let Some(id) = self.system.id_at(i) else { continue };
            if id == tail {
                continue;
            }
            self.system[id].update(delta, ctx.gravity);
        }
        observer.on_integrate();

        solver::satisfy(&mut self.system, self.config.relaxation_iterations, observer);
        observer.on_step_complete();
    }

    /// Sum of exact rest lengths along the active chain.
    pub fn current_length(&self) -> F {
        if self.tail_rest_length().is_none() {
            return F::zero();
        }
        let mut total = F::zero();
        for i in (self.active_start() + 1)..self.system.len() {
            let (Some(prev), Some(p)) = (self.system.id_at(i - 1), self.system.point_at(i)) else {
                continue;
            };
            if let Some(rest) = p.rest_length_to(prev) {
                total = total + rest;
            }
        }
        total
    }

    /// Rest length of the tail's link to its neighbour, `None` once the
    /// tail has been cut loose.
    pub fn tail_rest_length(&self) -> Option<F> {
        let neighbour = self.system.id_at(self.system.len().checked_sub(2)?)?;
        self.tail().rest_length_to(neighbour)
    }

    /// Pin the anchor; it snaps to `position` on every update.
    pub fn pin_anchor(&mut self, position: Vec2<F>) {
        let anchor = self.anchor;
        self.system[anchor].pin_to(position);
    }

    pub fn unpin_anchor(&mut self) {
        let anchor = self.anchor;
        self.system[anchor].unpin();
    }

    /// Sync the tail with the payload that owns it.
    pub fn set_tail_position(&mut self, position: Vec2<F>) {
        let tail = &mut self.system[self.tail];
        tail.previous_position = tail.position;
        tail.position = position;
    }

    pub fn anchor(&self) -> &PointMass<F> {
        &self.system[self.anchor]
    }

    pub fn tail(&self) -> &PointMass<F> {
        &self.system[self.tail]
    }

    pub fn anchor_id(&self) -> PointId {
        self.anchor
    }

    pub fn tail_id(&self) -> PointId {
        self.tail
    }

    /// Point handles from anchor to tail, dead sub-chain included.
    pub fn point_ids(&self) -> &[PointId] {
        self.system.ids()
    }

    pub fn point(&self, index: usize) -> Option<&PointMass<F>> {
        self.system.point_at(index)
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.system.positions()
    }

    pub fn len(&self) -> usize {
        self.system.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty()
    }

    /// Segments in the active chain, from the anchor or stand-in to the tail.
    pub fn segment_count(&self) -> usize {
        self.system.len() - 1 - self.active_start()
    }

    pub fn state(&self) -> RopeState {
        self.state
    }

    pub fn is_cut(&self) -> bool {
        self.cut.is_some()
    }

    pub fn is_reinforced(&self) -> bool {
        self.reinforced
    }

    /// Index passed to the cut, if any.
    pub fn cut_index(&self) -> Option<usize> {
        self.cut.as_ref().map(|c| c.index)
    }

    /// Stand-in point spliced in by the cut.
    pub fn stand_in(&self) -> Option<PointId> {
        self.cut.as_ref().and_then(|c| c.stand_in)
    }

    /// Opacity of the dying sub-chain while cutting.
    pub fn fade_alpha(&self) -> Option<F> {
        match (&self.cut, self.state) {
            (Some(c), RopeState::Cutting) => Some(c.fade.alpha()),
            _ => None,
        }
    }

    pub fn config(&self) -> &RopeConfig<F> {
        &self.config
    }

    pub fn system(&self) -> &ConstraintSystem<F> {
        &self.system
    }

    fn advance_cut<O: StepObserver>(&mut self, delta: F, observer: &mut O) {
        if self.state != RopeState::Cutting {
            return;
        }
        let finished = match self.cut.as_mut() {
            Some(c) => c.fade.advance(delta),
            None => return,
        };
        if finished {
            self.sever(observer);
        }
    }

    fn sever<O: StepObserver>(&mut self, observer: &mut O) {
        let mut removed = 0;
        if let Some(stand_in) = self.stand_in() {
            if let Some(index) = self.system.index_of(stand_in) {
                for _ in 0..index {
                    self.system.remove_at(0);
                }
                removed = index;
                self.anchor = stand_in;
            }
        }
        self.state = RopeState::Severed;

        info!(removed, points = self.len(), "rope severed");
        observer.on_severed(removed);
    }

    /// First point of the active chain: the stand-in after a cut, else the
    /// anchor.
    fn active_start(&self) -> usize {
        self.stand_in()
            .and_then(|id| self.system.index_of(id))
            .unwrap_or(0)
    }

    fn can_remove_before_tail(&self) -> bool {
        self.system.len() >= 3 && self.system.len() - 2 > self.active_start()
    }

    fn cap_for(&self, index: usize) -> F {
        F::from_usize(index) * (self.config.segment_rest_length + self.config.reinforce_slack)
    }

    fn live_weight(&self) -> F {
        if self.reinforced { self.config.stiffened_weight } else { self.config.point_weight }
    }

    fn insert_before_tail(&mut self, offset: Vec2<F>, tail_rest: F) {
        let tail_index = self.system.len() - 1;
        let Some(prev_id) = self.system.id_at(tail_index - 1) else { return };
        let prev = &self.system[prev_id];

        let mut point = PointMass::new(prev.position + offset, self.live_weight());
        point.previous_position = prev.previous_position + offset;
        point.add_constraint(prev_id, self.config.segment_rest_length, ConstraintKind::Exact);
        if self.reinforced {
            point.add_constraint(self.anchor, self.cap_for(tail_index), ConstraintKind::AtMost);
        }

        let id = self.system.insert_at(point, tail_index);
        let tail = self.tail;
        self.system[tail].retarget(prev_id, id, tail_rest);
    }

    fn remove_before_tail(&mut self, tail_rest: F) {
        let tail_index = self.system.len() - 1;
        let (Some(old), Some(new)) = (self.system.id_at(tail_index - 1), self.system.id_at(tail_index - 2)) else {
            return;
        };
        let tail = self.tail;
        self.system[tail].retarget(old, new, tail_rest);
        self.system.remove_at(tail_index - 1);
    }

    fn set_tail_rest(&mut self, rest: F) {
        let Some(neighbour) = self.system.id_at(self.system.len() - 2) else { return };
        let tail = self.tail;
        self.system[tail].set_rest_length(neighbour, rest);
    }

    fn refresh_tail_caps(&mut self) {
        let cap = self.cap_for(self.system.len() - 1);
        let tail = self.tail;
        for c in self.system[tail].constraints.iter_mut() {
            if c.kind == ConstraintKind::AtMost {
                c.rest_length = cap;
            }
        }
    }
}
