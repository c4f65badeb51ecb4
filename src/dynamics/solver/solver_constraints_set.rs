use super::{ConstraintError, ContactBody, ImpulseBounds, NonPenetrationConstraint, RowKind};
use crate::math::{BodyIndex, ConstraintRow, Real, Vector, JACOBIAN_DIM};
use crate::utils;

/// The set of constraints accumulated for one simulation step.
///
/// All the per-constraint rows are stored contiguously: the slot `k` of the constraint `l`
/// lives at index `12 * l + k` of each row buffer. The buffers grow in lockstep and are
/// reused from one step to the next.
#[derive(Clone, Debug, Default)]
pub struct SolverConstraintSet {
    body_count: usize,
    jacobians: Vec<Real>,
    inv_mass_traces: Vec<Real>,
    violations: Vec<Real>,
    violation_rates: Vec<Real>,
    external_forces: Vec<Real>,
    bounds: Vec<ImpulseBounds>,
    bodies1: Vec<BodyIndex>,
    bodies2: Vec<Option<BodyIndex>>,
}

#[inline]
fn row(data: &[Real], constraint: usize) -> &[Real] {
    &data[constraint * JACOBIAN_DIM..(constraint + 1) * JACOBIAN_DIM]
}

impl SolverConstraintSet {
    /// An empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty constraint set with room for `capacity` constraints.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            body_count: 0,
            jacobians: Vec::with_capacity(capacity * JACOBIAN_DIM),
            inv_mass_traces: Vec::with_capacity(capacity * JACOBIAN_DIM),
            violations: Vec::with_capacity(capacity * JACOBIAN_DIM),
            violation_rates: Vec::with_capacity(capacity * JACOBIAN_DIM),
            external_forces: Vec::with_capacity(capacity * JACOBIAN_DIM),
            bounds: Vec::with_capacity(capacity),
            bodies1: Vec::with_capacity(capacity),
            bodies2: Vec::with_capacity(capacity),
        }
    }

    /// Removes every constraint and records the number of bodies of the next step.
    pub fn reset(&mut self, body_count: usize) {
        self.body_count = body_count;
        self.jacobians.clear();
        self.inv_mass_traces.clear();
        self.violations.clear();
        self.violation_rates.clear();
        self.external_forces.clear();
        self.bounds.clear();
        self.bodies1.clear();
        self.bodies2.clear();
    }

    /// Appends a constraint and returns its index.
    ///
    /// `body2` is `None` for a constraint involving a single body, in which case the last
    /// six slots of every row are ignored. Nothing is validated here: malformed values end
    /// up as non-finite velocity corrections after the solve (see [`Self::validate`]).
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
        self.jacobians.extend_from_slice(&jacobian);
        self.inv_mass_traces.extend_from_slice(&inv_mass_trace);
        self.violations.extend_from_slice(&violation);
        self.violation_rates.extend_from_slice(&violation_rate);
        self.external_forces.extend_from_slice(&external_forces);
        self.bounds.push(bounds);
        self.bodies1.push(body1);
        self.bodies2.push(body2);
        self.len() - 1
    }

    /// Derives a unilateral non-penetration constraint from a contact and appends it.
    ///
    /// Returns `None`, without adding anything, if the contact points are not penetrating
    /// along `normal`.
    pub fn add_non_penetration_constraint(
        &mut self,
        normal: &Vector<Real>,
        body1: &ContactBody,
        body2: &ContactBody,
    ) -> Option<usize> {
        let contact = NonPenetrationConstraint::new(*normal, body1, body2);

        if !contact.is_penetrating() {
            log::trace!(
                "Skipping separating contact between bodies {} and {} (distance: {}).",
                body1.index,
                body2.index,
                contact.signed_distance()
            );
            return None;
        }

        let rows = contact.rows();
        Some(self.add_constraint(
            rows.jacobian,
            rows.inv_mass_trace,
            rows.violation,
            rows.violation_rate,
            rows.external_forces,
            ImpulseBounds::unilateral(),
            body1.index,
            Some(body2.index),
        ))
    }

    /// The number of constraints.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// The number of bodies given to the last [`Self::reset`].
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// The Jacobian row `G` of a constraint.
    pub fn jacobian(&self, constraint: usize) -> &[Real] {
        row(&self.jacobians, constraint)
    }

    /// The inverse mass and inertia trace of a constraint.
    pub fn inv_mass_trace(&self, constraint: usize) -> &[Real] {
        row(&self.inv_mass_traces, constraint)
    }

    /// The violation row `q` of a constraint.
    pub fn violation(&self, constraint: usize) -> &[Real] {
        row(&self.violations, constraint)
    }

    /// The violation rate row `q̇` of a constraint.
    pub fn violation_rate(&self, constraint: usize) -> &[Real] {
        row(&self.violation_rates, constraint)
    }

    /// The external forces and torques acting on the bodies of a constraint.
    pub fn external_forces(&self, constraint: usize) -> &[Real] {
        row(&self.external_forces, constraint)
    }

    /// The impulse bounds of a constraint.
    pub fn bounds(&self, constraint: usize) -> ImpulseBounds {
        self.bounds[constraint]
    }

    /// The bodies coupled by a constraint.
    pub fn bodies(&self, constraint: usize) -> (BodyIndex, Option<BodyIndex>) {
        (self.bodies1[constraint], self.bodies2[constraint])
    }

    /// Checks every constraint for out-of-range bodies, non-finite rows and inverted bounds.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        for l in 0..self.len() {
            let (body1, body2) = self.bodies(l);
            for body in std::iter::once(body1).chain(body2) {
                if body as usize >= self.body_count {
                    return Err(ConstraintError::BodyIndexOutOfRange {
                        constraint: l,
                        body: body as usize,
                        body_count: self.body_count,
                    });
                }
            }

            let rows = [
                (RowKind::Jacobian, self.jacobian(l)),
                (RowKind::InvMassTrace, self.inv_mass_trace(l)),
                (RowKind::Violation, self.violation(l)),
                (RowKind::ViolationRate, self.violation_rate(l)),
                (RowKind::ExternalForces, self.external_forces(l)),
            ];
            for (kind, values) in rows {
                if !utils::row_is_finite(values) {
                    return Err(ConstraintError::NonFiniteRow {
                        constraint: l,
                        row: kind,
                    });
                }
            }

            let bounds = self.bounds(l);
            if bounds.is_inverted() {
                return Err(ConstraintError::InvertedBounds {
                    constraint: l,
                    lower: bounds.lower.value().unwrap_or(Real::NEG_INFINITY),
                    upper: bounds.upper.value().unwrap_or(Real::INFINITY),
                });
            }
        }

        Ok(())
    }
}
