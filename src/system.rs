//! Ordered point container backed by a generation-checked arena.
//!
//! Chain order lives in a separate list of handles, so inserting or removing
//! a point mid-chain only shifts handles. A `PointId` keeps naming the same
//! point across reindexing, and a removed point's id goes stale instead of
//! silently aliasing whatever reuses its slot.

use crate::config::StepContext;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::point::PointMass;
use crate::solver;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;
use core::ops::{Index, IndexMut};

/// Stable handle to a point in a [`ConstraintSystem`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointId {
    index: u32,
    generation: u32,
}

impl PointId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        PointId { index, generation }
    }

    pub fn slot(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Slot<F: Float> {
    generation: u32,
    point: Option<PointMass<F>>,
}

/// An ordered, mutable chain of point masses.
///
/// No constraint consistency is enforced here; callers editing topology are
/// responsible for retargeting constraints.
#[derive(Clone, Debug)]
pub struct ConstraintSystem<F: Float> {
    slots: AllocVec<Slot<F>>,
    free: AllocVec<u32>,
    order: AllocVec<PointId>,
}

impl<F: Float> ConstraintSystem<F> {
    pub fn new() -> Self {
        ConstraintSystem {
            slots: AllocVec::new(),
            free: AllocVec::new(),
            order: AllocVec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ConstraintSystem {
            slots: AllocVec::with_capacity(capacity),
            free: AllocVec::new(),
            order: AllocVec::with_capacity(capacity),
        }
    }

    /// Insert `point` at chain position `index`, shifting later points back.
    ///
    /// # Panics
    /// If `index > len()`.
    pub fn insert_at(&mut self, point: PointMass<F>, index: usize) -> PointId {
        assert!(index <= self.order.len(), "insert index {} out of bounds (len: {})", index, self.order.len());
        let id = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.point = Some(point);
                PointId::new(slot, entry.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, point: Some(point) });
                PointId::new(slot, 0)
            }
        };
        self.order.insert(index, id);
        id
    }

    /// Append `point` to the end of the chain.
    pub fn push(&mut self, point: PointMass<F>) -> PointId {
        let len = self.order.len();
        self.insert_at(point, len)
    }

    /// Remove the point at chain position `index` and return it.
    ///
    /// Its id goes stale; constraints elsewhere that still target it are
    /// skipped by the solver.
    ///
    /// # Panics
    /// If `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> PointMass<F> {
        let id = self.order.remove(index);
        let entry = &mut self.slots[id.slot()];
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        match entry.point.take() {
            Some(point) => point,
            None => unreachable!("chain order referenced an empty slot"),
        }
    }

    pub fn get(&self, id: PointId) -> Option<&PointMass<F>> {
        self.slots
            .get(id.slot())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.point.as_ref())
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut PointMass<F>> {
        self.slots
            .get_mut(id.slot())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.point.as_mut())
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.get(id).is_some()
    }

    /// Mutable access to two distinct live points at once.
    pub fn pair_mut(&mut self, a: PointId, b: PointId) -> Option<(&mut PointMass<F>, &mut PointMass<F>)> {
        if a.slot() == b.slot() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.slot() < b.slot() {
            (a.slot(), b.slot(), false)
        } else {
            (b.slot(), a.slot(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].point.as_mut()?;
        let second = tail[0].point.as_mut()?;
        if swapped { Some((second, first)) } else { Some((first, second)) }
    }

    pub fn id_at(&self, index: usize) -> Option<PointId> {
        self.order.get(index).copied()
    }

    pub fn point_at(&self, index: usize) -> Option<&PointMass<F>> {
        self.id_at(index).and_then(|id| self.get(id))
    }

    pub fn point_at_mut(&mut self, index: usize) -> Option<&mut PointMass<F>> {
        self.id_at(index).and_then(move |id| self.get_mut(id))
    }

    /// Chain position of `id`. Linear in chain length.
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    /// Handles in chain order.
    pub fn ids(&self) -> &[PointId] {
        &self.order
    }

    /// Points in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &PointMass<F>> + '_ {
        self.order.iter().filter_map(move |&id| self.get(id))
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.iter().map(|p| p.position).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Integrate every point, then relax all constraints `iterations` times.
    pub fn step<O: StepObserver>(
        &mut self,
        delta: F,
        ctx: &StepContext<F>,
        iterations: usize,
        observer: &mut O,
    ) {
        for slot in self.slots.iter_mut() {
            if let Some(p) = slot.point.as_mut() {
                p.update(delta, ctx.gravity);
            }
        }
        observer.on_integrate();

        solver::satisfy(self, iterations, observer);
        observer.on_step_complete();
    }
}

impl<F: Float> Index<PointId> for ConstraintSystem<F> {
    type Output = PointMass<F>;

    /// # Panics
    /// If `id` is stale.
    fn index(&self, id: PointId) -> &PointMass<F> {
        match self.get(id) {
            Some(p) => p,
            None => panic!("stale point id {:?}", id),
        }
    }
}

impl<F: Float> IndexMut<PointId> for ConstraintSystem<F> {
    fn index_mut(&mut self, id: PointId) -> &mut PointMass<F> {
        match self.get_mut(id) {
            Some(p) => p,
            None => panic!("stale point id {:?}", id),
        }
    }
}

impl<F: Float> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}
