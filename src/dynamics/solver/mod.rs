//! The projected Gauss-Seidel constraint solver and its constraint storage.

pub use self::constraint_solver::ConstraintSolver;
pub use self::contact_constraint::{ConstraintRows, ContactBody, NonPenetrationConstraint};
pub use self::delta_vel::DeltaVelocities;
pub use self::error::{ConstraintError, RowKind};
pub use self::impulse_bounds::{ImpulseBound, ImpulseBounds};
pub use self::solver_constraints_set::SolverConstraintSet;
pub use self::velocity_solver::VelocitySolver;

mod constraint_solver;
mod contact_constraint;
mod delta_vel;
mod error;
mod impulse_bounds;
mod solver_constraints_set;
mod velocity_solver;
