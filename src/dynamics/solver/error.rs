use crate::math::Real;

/// Identifies one of the five rows stored for each constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// The Jacobian row `G`.
    Jacobian,
    /// The inverse mass and inertia trace.
    InvMassTrace,
    /// The constraint violation `q`.
    Violation,
    /// The constraint violation rate `q̇`.
    ViolationRate,
    /// The external forces and torques.
    ExternalForces,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RowKind::Jacobian => "jacobian",
            RowKind::InvMassTrace => "inverse mass trace",
            RowKind::Violation => "violation",
            RowKind::ViolationRate => "violation rate",
            RowKind::ExternalForces => "external forces",
        };
        f.write_str(name)
    }
}

/// A malformed constraint, reported by the opt-in validation of a constraint set.
///
/// Solving never checks its input: these errors are only produced by
/// [`SolverConstraintSet::validate`](crate::dynamics::SolverConstraintSet::validate).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// A constraint references a body outside of the body set.
    #[error("constraint {constraint} references body {body} but only {body_count} bodies exist")]
    BodyIndexOutOfRange {
        /// The offending constraint.
        constraint: usize,
        /// The invalid body index.
        body: usize,
        /// The number of bodies the set was reset with.
        body_count: usize,
    },
    /// A constraint row contains a `NaN` or infinite value.
    #[error("constraint {constraint} has a non-finite {row} row")]
    NonFiniteRow {
        /// The offending constraint.
        constraint: usize,
        /// The row containing the non-finite value.
        row: RowKind,
    },
    /// The lower bound of a constraint is greater than its upper bound.
    #[error("constraint {constraint} has inverted impulse bounds [{lower}, {upper}]")]
    InvertedBounds {
        /// The offending constraint.
        constraint: usize,
        /// The lower bound.
        lower: Real,
        /// The upper bound.
        upper: Real,
    },
}
