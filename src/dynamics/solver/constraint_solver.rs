use super::{
    ConstraintError, ContactBody, DeltaVelocities, ImpulseBounds, SolverConstraintSet,
    VelocitySolver,
};
use crate::counters::Counters;
use crate::dynamics::IntegrationParameters;
use crate::math::{BodyIndex, ConstraintRow, Real, Vector};

/// The constraint solver used once per simulation step.
///
/// Each step must follow the same sequence: [`ConstraintSolver::reset`] with the number of
/// bodies, one `add_*` call per active constraint, a single [`ConstraintSolver::solve`], then
/// the velocity corrections can be read with [`ConstraintSolver::delta_velocities`] and added
/// to the bodies' velocities. Calling `solve` twice without a `reset` accumulates the
/// corrections twice.
#[derive(Clone, Debug)]
pub struct ConstraintSolver {
    params: IntegrationParameters,
    constraints: SolverConstraintSet,
    velocity_solver: VelocitySolver,
    deltas: DeltaVelocities,
    counters: Counters,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new(IntegrationParameters::default())
    }
}

impl ConstraintSolver {
    /// Creates a solver applying the given parameters to every constraint.
    pub fn new(params: IntegrationParameters) -> Self {
        Self {
            params,
            constraints: SolverConstraintSet::new(),
            velocity_solver: VelocitySolver::new(),
            deltas: DeltaVelocities::default(),
            counters: Counters::default(),
        }
    }

    /// The solver parameters.
    pub fn params(&self) -> &IntegrationParameters {
        &self.params
    }

    /// Mutable reference to the solver parameters.
    ///
    /// Changes should only be made between two steps.
    pub fn params_mut(&mut self) -> &mut IntegrationParameters {
        &mut self.params
    }

    /// Starts a new step: removes all the constraints and zeroes the velocity corrections of
    /// `body_count` bodies.
    pub fn reset(&mut self, body_count: usize) {
        self.constraints.reset(body_count);
        self.deltas.reset(body_count);
        self.velocity_solver.clear();
        self.counters.reset();
    }

    /// Adds a constraint to the current step and returns its index.
    ///
    /// See [`SolverConstraintSet::add_constraint`].
    pub fn add_constraint(
        &mut self,
        jacobian: ConstraintRow,
        inv_mass_trace: ConstraintRow,
        violation: ConstraintRow,
        violation_rate: ConstraintRow,
        external_forces: ConstraintRow,
        bounds: ImpulseBounds,
        body1: BodyIndex,
        body2: Option<BodyIndex>,
    ) -> usize {
        self.constraints.add_constraint(
            jacobian,
            inv_mass_trace,
            violation,
            violation_rate,
            external_forces,
            bounds,
            body1,
            body2,
        )
    }

    /// Adds a non-penetration constraint for a contact, if the bodies are penetrating.
    ///
    /// See [`SolverConstraintSet::add_non_penetration_constraint`].
    pub fn add_non_penetration_constraint(
        &mut self,
        normal: &Vector<Real>,
        body1: &ContactBody,
        body2: &ContactBody,
    ) -> Option<usize> {
        self.constraints
            .add_non_penetration_constraint(normal, body1, body2)
    }

    /// Solves all the constraints added since the last reset.
    ///
    /// Malformed constraints are not detected: they result in non-finite velocity
    /// corrections, which are only reported as a warning in the log.
    ///
    /// # Panics
    ///
    /// Panics if a constraint references a body index greater than or equal to the body
    /// count given to [`ConstraintSolver::reset`]. Use [`ConstraintSolver::validate`] to
    /// detect this beforehand.
    pub fn solve(&mut self) {
        self.counters.step_started();
        self.velocity_solver.solve(
            &self.params,
            &self.constraints,
            &mut self.deltas,
            &mut self.counters,
        );
        self.counters.step_completed();

        if self.deltas.has_non_finite() {
            log::warn!(
                "The constraint solver produced non-finite velocity corrections ({} constraints).",
                self.constraints.len()
            );
        }
    }

    /// The velocity corrections computed by the last solve.
    pub fn delta_velocities(&self) -> &DeltaVelocities {
        &self.deltas
    }

    /// The impulse of each constraint computed by the last solve, indexed like the constraints.
    pub fn impulses(&self) -> &[Real] {
        self.velocity_solver.impulses()
    }

    /// The constraints of the current step.
    pub fn constraints(&self) -> &SolverConstraintSet {
        &self.constraints
    }

    /// The performance counters.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Mutable reference to the performance counters, e.g., to enable them.
    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    /// Checks the constraints of the current step. See [`SolverConstraintSet::validate`].
    pub fn validate(&self) -> Result<(), ConstraintError> {
        self.constraints.validate()
    }

    /// Returns `true` if the last solve produced `NaN` or infinite velocity corrections.
    pub fn has_non_finite_deltas(&self) -> bool {
        self.deltas.has_non_finite()
    }
}
