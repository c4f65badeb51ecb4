use super::{DeltaVelocities, SolverConstraintSet};
use crate::counters::Counters;
use crate::dynamics::IntegrationParameters;
use crate::math::Real;
use crate::utils;

/// Projected Gauss-Seidel solver computing one impulse per constraint.
///
/// The constraints are first assembled (effective inverse mass and SPOOK bias of each
/// constraint), then swept sequentially in index order for a fixed number of iterations.
/// Each impulse increment is immediately propagated to the velocity corrections of its
/// bodies so that the following constraints of the same sweep see it.
#[derive(Clone, Debug, Default)]
pub struct VelocitySolver {
    impulses: Vec<Real>,
    inv_effective_masses: Vec<Real>,
    biases: Vec<Real>,
}

impl VelocitySolver {
    /// A solver with no cached state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the results of the last solve.
    pub fn clear(&mut self) {
        self.impulses.clear();
        self.inv_effective_masses.clear();
        self.biases.clear();
    }

    /// The impulse (Lagrange multiplier) of each constraint after the last solve.
    pub fn impulses(&self) -> &[Real] {
        &self.impulses
    }

    /// The effective inverse mass `1 / (G·M⁻¹·Gᵀ + eps)` of each constraint.
    pub fn inv_effective_masses(&self) -> &[Real] {
        &self.inv_effective_masses
    }

    /// The SPOOK bias `-a·G·q - b·G·q̇ - h·G·M⁻¹·f` of each constraint.
    pub fn biases(&self) -> &[Real] {
        &self.biases
    }

    /// Solves all the constraints, accumulating the velocity corrections into `deltas`.
    ///
    /// `deltas` must have been reset for the body count of `constraints`. Impulses always
    /// start from zero.
    pub fn solve(
        &mut self,
        params: &IntegrationParameters,
        constraints: &SolverConstraintSet,
        deltas: &mut DeltaVelocities,
        counters: &mut Counters,
    ) {
        counters.assembly_started();
        self.init_constraints(params, constraints);
        counters.assembly_completed();

        counters.set_nconstraints(constraints.len());
        counters.set_nbodies(deltas.len());
        counters.set_niterations(params.num_solver_iterations);

        log::debug!(
            "Solving {} constraints between {} bodies with {} iterations.",
            constraints.len(),
            deltas.len(),
            params.num_solver_iterations
        );

        counters.velocity_resolution_started();
        let eps = params.spook.eps;
        for _ in 0..params.num_solver_iterations {
            for l in 0..constraints.len() {
                self.solve_constraint(l, eps, constraints, deltas);
            }
        }
        counters.velocity_resolution_completed();
    }

    fn init_constraints(&mut self, params: &IntegrationParameters, constraints: &SolverConstraintSet) {
        let spook = &params.spook;
        let num_constraints = constraints.len();

        self.impulses.clear();
        self.impulses.resize(num_constraints, 0.0);
        self.inv_effective_masses.clear();
        self.biases.clear();

        for l in 0..num_constraints {
            let jacobian = constraints.jacobian(l);
            let inv_mass = constraints.inv_mass_trace(l);

            let g_minv_gt = utils::row_weighted_dot(jacobian, inv_mass, jacobian);
            let gq = utils::row_dot(jacobian, constraints.violation(l));
            let gw = utils::row_dot(jacobian, constraints.violation_rate(l));
            let g_minv_f =
                utils::row_weighted_dot(jacobian, inv_mass, constraints.external_forces(l));

            self.inv_effective_masses.push(1.0 / (g_minv_gt + spook.eps));
            self.biases
                .push(-spook.a * gq - spook.b * gw - params.dt * g_minv_f);
        }
    }

    #[inline]
    fn solve_constraint(
        &mut self,
        l: usize,
        eps: Real,
        constraints: &SolverConstraintSet,
        deltas: &mut DeltaVelocities,
    ) {
        let jacobian = constraints.jacobian(l);
        let (body1, body2) = constraints.bodies(l);
        let body1 = body1 as usize;
        let body2 = body2.map(|b| b as usize);

        let gu = deltas.project(jacobian, body1, body2);
        let impulse = self.impulses[l];
        let dlambda = self.inv_effective_masses[l] * (self.biases[l] - gu - eps * impulse);

        // Only the clamped increment is applied to the bodies.
        let new_impulse = constraints.bounds(l).clamp(impulse + dlambda);
        let dlambda = new_impulse - impulse;
        self.impulses[l] = new_impulse;

        deltas.apply_impulse(
            dlambda,
            jacobian,
            constraints.inv_mass_trace(l),
            body1,
            body2,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{ImpulseBounds, SpookParameters};
    use crate::math::{ConstraintRow, JACOBIAN_DIM};
    use approx::assert_relative_eq;

    const X_AXIS: ConstraintRow = [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];

    fn params(iterations: usize) -> IntegrationParameters {
        IntegrationParameters {
            dt: 1.0 / 60.0,
            num_solver_iterations: iterations,
            spook: SpookParameters::from_coefficients(0.1, 0.1, 1.0e-4),
        }
    }

    fn x_axis_constraint(set: &mut SolverConstraintSet, separation: Real, bounds: ImpulseBounds) {
        let mut violation = [0.0; JACOBIAN_DIM];
        violation[0] = -separation;
        violation[6] = separation;
        let _ = set.add_constraint(
            X_AXIS,
            [1.0; JACOBIAN_DIM],
            violation,
            [0.0; JACOBIAN_DIM],
            [0.0; JACOBIAN_DIM],
            bounds,
            0,
            Some(1),
        );
    }

    fn run(
        params: &IntegrationParameters,
        set: &SolverConstraintSet,
    ) -> (VelocitySolver, DeltaVelocities) {
        let mut solver = VelocitySolver::new();
        let mut deltas = DeltaVelocities::new(set.body_count());
        solver.solve(params, set, &mut deltas, &mut Counters::default());
        (solver, deltas)
    }

    #[test]
    fn assembly_computes_effective_mass_and_bias() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        let mut violation_rate = [0.0; JACOBIAN_DIM];
        violation_rate[6] = 2.0;
        let mut forces = [0.0; JACOBIAN_DIM];
        forces[0] = 6.0;
        let _ = set.add_constraint(
            X_AXIS,
            [0.5; JACOBIAN_DIM],
            [0.0; JACOBIAN_DIM],
            violation_rate,
            forces,
            ImpulseBounds::UNBOUNDED,
            0,
            Some(1),
        );

        let params = params(0);
        let (solver, _) = run(&params, &set);

        assert_relative_eq!(solver.inv_effective_masses()[0], 1.0 / (1.0 + 1.0e-4));
        // -a·0 - b·2 - h·(-1·0.5·6)
        assert_relative_eq!(solver.biases()[0], -0.2 + 3.0 / 60.0, epsilon = 1.0e-6);
    }

    #[test]
    fn end_to_end_linear_separation() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        // q = [-1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]
        x_axis_constraint(&mut set, 1.0, ImpulseBounds::unilateral());

        let (solver, deltas) = run(&params(10), &set);

        assert!(solver.impulses()[0] >= 0.0);
        assert_eq!(deltas.linear(0).x, -deltas.linear(1).x);
    }

    #[test]
    fn end_to_end_linear_penetration() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        x_axis_constraint(&mut set, -1.0, ImpulseBounds::unilateral());

        let (solver, deltas) = run(&params(10), &set);
        let impulse = solver.impulses()[0];

        // bias = -a·G·q = 0.2, effective mass = 1 / (2 + eps)
        assert_relative_eq!(impulse, 0.2 / (2.0 + 1.0e-4), epsilon = 1.0e-5);
        assert!(deltas.linear(1).x > 0.0);
        assert_relative_eq!(deltas.linear(0).x, -deltas.linear(1).x);
        assert_relative_eq!(deltas.linear(1).x, impulse);
        assert_eq!(deltas.angular(0).norm(), 0.0);
    }

    #[test]
    fn upper_bound_is_enforced() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        x_axis_constraint(&mut set, -1.0, ImpulseBounds::from_raw(Real::NAN, 0.05));

        let (solver, deltas) = run(&params(10), &set);

        assert_eq!(solver.impulses()[0], 0.05);
        assert_relative_eq!(deltas.linear(1).x, 0.05);
    }

    #[test]
    fn unbounded_impulse_can_pull() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        x_axis_constraint(&mut set, 1.0, ImpulseBounds::UNBOUNDED);

        let (solver, deltas) = run(&params(10), &set);

        assert!(solver.impulses()[0] < 0.0);
        assert!(deltas.linear(0).x > 0.0);
        assert!(deltas.linear(1).x < 0.0);
    }

    #[test]
    fn single_body_constraint_only_touches_its_body() {
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        let mut jacobian = [0.0; JACOBIAN_DIM];
        jacobian[1] = 1.0;
        jacobian[5] = 1.0;
        let mut violation = [0.0; JACOBIAN_DIM];
        violation[1] = -0.5;
        let _ = set.add_constraint(
            jacobian,
            [1.0; JACOBIAN_DIM],
            violation,
            [0.0; JACOBIAN_DIM],
            [0.0; JACOBIAN_DIM],
            ImpulseBounds::unilateral(),
            1,
            None,
        );

        let (solver, deltas) = run(&params(5), &set);

        assert!(solver.impulses()[0] > 0.0);
        assert!(deltas.linear(1).y > 0.0);
        assert_relative_eq!(deltas.linear(1).y, deltas.angular(1).z);
        assert_eq!(deltas.linear(0).norm(), 0.0);
        assert_eq!(deltas.angular(0).norm(), 0.0);
    }

    #[test]
    fn later_constraints_see_earlier_corrections() {
        // Two identical constraints on the same bodies: the second one finds the
        // velocity already corrected by the first and adds (almost) nothing.
        let mut set = SolverConstraintSet::new();
        set.reset(2);
        x_axis_constraint(&mut set, -1.0, ImpulseBounds::unilateral());
        x_axis_constraint(&mut set, -1.0, ImpulseBounds::unilateral());

        let (solver, _) = run(&params(1), &set);
        let impulses = solver.impulses();

        assert!(impulses[0] > 0.0);
        assert!(impulses[1].abs() < 1.0e-3 * impulses[0]);
    }
}
