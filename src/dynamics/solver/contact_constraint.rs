use crate::math::{AngVector, BodyIndex, ConstraintRow, Real, Vector};
use crate::utils;

/// The state of one of the two bodies touching at a contact, as seen by the solver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactBody {
    /// The index of the body in the world's body array.
    pub index: BodyIndex,
    /// The world-space position of the body's center of mass.
    pub position: Vector<Real>,
    /// The contact point, relative to the body's center of mass.
    pub offset: Vector<Real>,
    /// The inverse mass of the body.
    pub inv_mass: Real,
    /// The diagonal of the body's inverse inertia tensor.
    pub inv_inertia: AngVector<Real>,
    /// The linear velocity of the body.
    pub linvel: Vector<Real>,
    /// The angular velocity of the body.
    pub angvel: AngVector<Real>,
    /// The external force applied to the body.
    pub force: Vector<Real>,
    /// The external torque applied to the body.
    pub torque: AngVector<Real>,
}

impl Default for ContactBody {
    fn default() -> Self {
        Self {
            index: 0,
            position: Vector::zeros(),
            offset: Vector::zeros(),
            inv_mass: 0.0,
            inv_inertia: AngVector::zeros(),
            linvel: Vector::zeros(),
            angvel: AngVector::zeros(),
            force: Vector::zeros(),
            torque: AngVector::zeros(),
        }
    }
}

impl ContactBody {
    /// The world-space contact point on this body.
    #[inline]
    pub fn contact_point(&self) -> Vector<Real> {
        self.position + self.offset
    }

    /// The velocity of the material point of this body located at the contact point.
    #[inline]
    pub fn contact_point_velocity(&self) -> Vector<Real> {
        self.linvel + self.angvel.cross(&self.offset)
    }
}

/// The five rows describing one constraint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstraintRows {
    /// The Jacobian row `G`.
    pub jacobian: ConstraintRow,
    /// The inverse mass and inertia trace of both bodies.
    pub inv_mass_trace: ConstraintRow,
    /// The constraint violation `q`.
    pub violation: ConstraintRow,
    /// The violation rate `q̇`.
    pub violation_rate: ConstraintRow,
    /// The external forces and torques of both bodies.
    pub external_forces: ConstraintRow,
}

/// A unilateral constraint preventing two bodies from interpenetrating along a contact normal.
///
/// The normal points from the first body toward the second one. The Jacobian row is
/// `[-n, -(r1 × n), n, r2 × n]` so that `G·v` is the relative normal velocity of the two
/// contact points. The velocity row only carries the relative linear velocity `v2 - v1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NonPenetrationConstraint {
    normal: Vector<Real>,
    separation: Vector<Real>,
    rows: ConstraintRows,
}

impl NonPenetrationConstraint {
    /// Builds the constraint rows of a contact between two bodies.
    pub fn new(normal: Vector<Real>, body1: &ContactBody, body2: &ContactBody) -> Self {
        let separation = body2.contact_point() - body1.contact_point();
        let rel_vel = body2.linvel - body1.linvel;
        let zero = Vector::zeros();

        let torque_dir1 = body1.offset.cross(&normal);
        let torque_dir2 = body2.offset.cross(&normal);

        let rows = ConstraintRows {
            jacobian: utils::assemble_row(&-normal, &-torque_dir1, &normal, &torque_dir2),
            inv_mass_trace: utils::assemble_row(
                &Vector::repeat(body1.inv_mass),
                &body1.inv_inertia,
                &Vector::repeat(body2.inv_mass),
                &body2.inv_inertia,
            ),
            violation: utils::assemble_row(&-separation, &zero, &separation, &zero),
            violation_rate: utils::assemble_row(&-rel_vel, &zero, &rel_vel, &zero),
            external_forces: utils::assemble_row(
                &body1.force,
                &body1.torque,
                &body2.force,
                &body2.torque,
            ),
        };

        Self {
            normal,
            separation,
            rows,
        }
    }

    /// The contact normal.
    pub fn normal(&self) -> &Vector<Real> {
        &self.normal
    }

    /// The vector from the contact point of the first body to the contact point of the second.
    pub fn separation(&self) -> &Vector<Real> {
        &self.separation
    }

    /// The signed distance between the contact points along the normal.
    ///
    /// This is negative when the bodies are penetrating.
    pub fn signed_distance(&self) -> Real {
        self.separation.dot(&self.normal)
    }

    /// Are the bodies penetrating along the normal?
    pub fn is_penetrating(&self) -> bool {
        self.signed_distance() < 0.0
    }

    /// The constraint rows.
    pub fn rows(&self) -> &ConstraintRows {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::JACOBIAN_DIM;
    use crate::utils::row_dot;
    use approx::assert_relative_eq;
    use na::vector;

    fn bodies() -> (ContactBody, ContactBody) {
        let body1 = ContactBody {
            index: 3,
            position: vector![0.0, 0.0, 0.0],
            offset: vector![0.5, 0.2, -0.1],
            inv_mass: 0.5,
            inv_inertia: vector![1.0, 2.0, 3.0],
            linvel: vector![1.0, -2.0, 0.5],
            angvel: vector![0.3, 0.1, -0.7],
            force: vector![0.0, -9.81, 0.0],
            torque: vector![0.1, 0.2, 0.3],
        };
        let body2 = ContactBody {
            index: 4,
            position: vector![0.9, 0.1, 0.0],
            offset: vector![-0.5, 0.0, 0.2],
            inv_mass: 0.25,
            inv_inertia: vector![4.0, 5.0, 6.0],
            linvel: vector![-1.0, 0.0, 2.0],
            angvel: vector![0.0, 1.5, 0.2],
            force: vector![1.0, 2.0, 3.0],
            torque: vector![-0.1, -0.2, -0.3],
        };
        (body1, body2)
    }

    #[test]
    fn jacobian_measures_relative_normal_velocity() {
        let (body1, body2) = bodies();
        let normal = vector![1.0, 0.0, 0.0];
        let contact = NonPenetrationConstraint::new(normal, &body1, &body2);

        let state = utils::assemble_row(&body1.linvel, &body1.angvel, &body2.linvel, &body2.angvel);
        let expected = (body2.contact_point_velocity() - body1.contact_point_velocity()).dot(&normal);
        assert_relative_eq!(row_dot(&contact.rows().jacobian, &state), expected, epsilon = 1.0e-5);
    }

    #[test]
    fn signed_distance_is_measured_along_normal() {
        let (body1, body2) = bodies();
        let contact = NonPenetrationConstraint::new(vector![1.0, 0.0, 0.0], &body1, &body2);

        // (0.9 - 0.5) - (0.0 + 0.5)
        assert_relative_eq!(contact.signed_distance(), -0.1, epsilon = 1.0e-6);
        assert!(contact.is_penetrating());

        let contact = NonPenetrationConstraint::new(vector![0.0, 0.0, 1.0], &body1, &body2);
        assert_relative_eq!(contact.signed_distance(), 0.3, epsilon = 1.0e-6);
        assert!(!contact.is_penetrating());
    }

    #[test]
    fn rows_follow_slot_layout() {
        let (body1, body2) = bodies();
        let contact = NonPenetrationConstraint::new(vector![1.0, 0.0, 0.0], &body1, &body2);
        let rows = contact.rows();

        assert_eq!(
            rows.inv_mass_trace,
            [0.5, 0.5, 0.5, 1.0, 2.0, 3.0, 0.25, 0.25, 0.25, 4.0, 5.0, 6.0]
        );
        assert_eq!(
            rows.external_forces,
            [0.0, -9.81, 0.0, 0.1, 0.2, 0.3, 1.0, 2.0, 3.0, -0.1, -0.2, -0.3]
        );

        let q = contact.separation();
        let u = body2.linvel - body1.linvel;
        for k in 0..3 {
            assert_eq!(rows.violation[k], -q[k]);
            assert_eq!(rows.violation[6 + k], q[k]);
            assert_eq!(rows.violation_rate[k], -u[k]);
            assert_eq!(rows.violation_rate[6 + k], u[k]);
            assert_eq!(rows.violation[3 + k], 0.0);
            assert_eq!(rows.violation[9 + k], 0.0);
            assert_eq!(rows.violation_rate[3 + k], 0.0);
            assert_eq!(rows.violation_rate[9 + k], 0.0);
        }
        assert_eq!(rows.jacobian.len(), JACOBIAN_DIM);
    }

    #[test]
    fn velocity_row_ignores_angular_velocities() {
        let body1 = ContactBody {
            index: 0,
            offset: vector![0.0, 0.5, 0.0],
            inv_mass: 1.0,
            angvel: vector![0.0, 0.0, 2.0],
            ..ContactBody::default()
        };
        let body2 = ContactBody {
            index: 1,
            position: vector![-0.1, 0.5, 0.0],
            inv_mass: 1.0,
            ..ContactBody::default()
        };
        let contact = NonPenetrationConstraint::new(vector![1.0, 0.0, 0.0], &body1, &body2);

        assert!(body1.contact_point_velocity().norm() > 0.0);
        assert_eq!(contact.rows().violation_rate, [0.0; JACOBIAN_DIM]);
    }
}
