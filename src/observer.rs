//! Step observer trait for monitoring rope simulation progress.

/// Hooks called while a rope or constraint system steps.
///
/// Implement this to drive debug overlays, profiling, or the visual fade of a
/// severed rope. All methods default to no-ops.
pub trait StepObserver {
    /// Called after all non-tail points have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each relaxation pass.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}

    /// Called once, on the frame the anchor-side remainder of a cut rope is
    /// dropped from the chain. `removed` is how many points went with it.
    fn on_severed(&mut self, _removed: usize) {}
}

/// A no-op observer. Use as default when no observation is needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
