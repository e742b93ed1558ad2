//! Countdown between a cut and the removal of the dead sub-chain.

use crate::float::Float;

/// Quadratic ease-out on [0, 1].
pub fn ease_out_quad<F: Float>(t: F) -> F {
    let t = t.clamp(F::zero(), F::one());
    t * (F::two() - t)
}

/// Timer started by a cut. Renderers read [`CutFade::alpha`] to fade the
/// anchor-side remainder out; the rope drops it once the timer finishes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CutFade<F: Float> {
    duration: F,
    remaining: F,
}

impl<F: Float> CutFade<F> {
    pub fn new(duration: F) -> Self {
        let duration = duration.max(F::zero());
        CutFade { duration, remaining: duration }
    }

    /// Count down by `delta` seconds. Returns true once finished.
    pub fn advance(&mut self, delta: F) -> bool {
        self.remaining = (self.remaining - delta).max(F::zero());
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= F::zero()
    }

    pub fn remaining(&self) -> F {
        self.remaining
    }

    /// Elapsed share of the fade, 0 at the cut and 1 when finished.
    pub fn progress(&self) -> F {
        if self.duration <= F::zero() {
            return F::one();
        }
        F::one() - self.remaining / self.duration
    }

    /// Opacity for the dying sub-chain: 1 at the cut, eased down to 0.
    pub fn alpha(&self) -> F {
        F::one() - ease_out_quad(self.progress())
    }
}
