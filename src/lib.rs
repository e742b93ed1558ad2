//! Cuttable Verlet ropes for puzzle games.
//!
//! `tether` simulates a rope as a chain of point masses linked by length
//! constraints, integrated with position-based Verlet steps and relaxed
//! iteratively every frame. The chain can be edited live between frames:
//! wound in and out, stiffened, and cut, without ever leaving the solver an
//! inconsistent topology.
//!
//! # Features
//!
//! - **Point masses**: implicit velocity, mobility weights, optional pins
//! - **Constraints**: exact rods and at-most slack caps
//! - **Relaxation solver**: Gauss-Seidel passes, allocation-free
//! - **Stable handles**: generation-checked `PointId`s survive reindexing
//! - **Rope topology**: `extend`, `retract`, `reinforce`, `cut`
//! - **Observable**: monitor steps and severing via the `StepObserver` trait
//! - **`no_std` compatible**: only needs `alloc`
//!
//! ```
//! use tether::{NoOpStepObserver, Rope, RopeConfig, StepContext, Vec2};
//!
//! let mut rope: Rope<f32> = Rope::new(
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(0.0, 200.0),
//!     200.0,
//!     RopeConfig::new(),
//! ).unwrap();
//! rope.pin_anchor(Vec2::new(0.0, 0.0));
//!
//! let ctx = StepContext::earth_like();
//! rope.update(1.0 / 60.0, &ctx, &mut NoOpStepObserver);
//! assert_eq!(rope.len(), 11);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod point;
pub mod constraint;
pub mod system;
pub mod solver;
pub mod rope;
pub mod fade;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use point::PointMass;
pub use constraint::{Constraint, ConstraintKind};
pub use system::{ConstraintSystem, PointId};
pub use rope::{Rope, RopeState};
pub use fade::CutFade;
pub use config::{RopeConfig, StepContext};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::RopeError;
