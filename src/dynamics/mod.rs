//! Structures related to dynamics: constraints, solver parameters, velocity corrections.

pub use self::integration_parameters::{IntegrationParameters, SpookParameters};
pub use self::solver::{
    ConstraintError, ConstraintRows, ConstraintSolver, ContactBody, DeltaVelocities, ImpulseBound,
    ImpulseBounds, NonPenetrationConstraint, RowKind, SolverConstraintSet, VelocitySolver,
};

mod integration_parameters;
mod solver;
