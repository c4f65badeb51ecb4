//! # spook3d
//!
//! `spook3d` is the constraint-resolution core of a 3D rigid-body physics engine. Given a set of
//! velocity-level constraints between pairs of bodies (contacts, joints, non-penetration conditions)
//! it computes one impulse per constraint and accumulates the resulting velocity corrections of
//! every participating body over a single timestep.
//!
//! The solver is an iterative projected Gauss-Seidel scheme stabilized with SPOOK. Everything else
//! a full engine needs (shapes, collision detection, time integration) lives outside of this crate:
//! it only consumes the Jacobian rows, mass traces, violation terms, external forces and body
//! indices of each constraint.
//!
//! A typical physics step looks like this:
//!
//! ```
//! use spook3d::prelude::*;
//!
//! let mut solver = ConstraintSolver::new(IntegrationParameters::default());
//! solver.reset(2);
//! solver.add_constraint(
//!     [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
//!     [1.0; 12],
//!     [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
//!     [0.0; 12],
//!     [0.0; 12],
//!     ImpulseBounds::unilateral(),
//!     0,
//!     Some(1),
//! );
//! solver.solve();
//!
//! let deltas = solver.delta_velocities();
//! assert!(deltas.linear(0).x < 0.0);
//! assert!(deltas.linear(1).x > 0.0);
//! ```

#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)] // The 12-slot row algebra reads better with indices.

pub extern crate nalgebra as na;

/// The string version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod counters;
pub mod dynamics;
pub mod utils;

/// Elementary mathematical entities (vectors, constraint rows, etc).
pub mod math {
    /// The scalar type used throughout the solver.
    pub type Real = f32;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The maximum number of possible rotations and translations of a rigid body.
    pub const SPATIAL_DIM: usize = 6;

    /// The number of slots of a constraint row: the velocity state of two rigid bodies.
    ///
    /// Offsets `0..3` and `3..6` hold the linear and angular parts of the first body,
    /// offsets `6..9` and `9..12` hold the linear and angular parts of the second body.
    pub const JACOBIAN_DIM: usize = 2 * SPATIAL_DIM;

    /// A 3D vector.
    pub type Vector<N> = na::Vector3<N>;

    /// The type of an angular vector (angular velocity, torque, inertia diagonal).
    pub type AngVector<N> = na::Vector3<N>;

    /// One constraint row in generalized two-body coordinates.
    pub type ConstraintRow = [Real; JACOBIAN_DIM];

    /// The index of a rigid body, as stored by the solver.
    pub type BodyIndex = u16;
}

/// Prelude containing the common types defined by this crate.
pub mod prelude {
    pub use crate::counters::Counters;
    pub use crate::dynamics::*;
    pub use crate::math::*;
    pub use na::{vector, Vector3};
}
