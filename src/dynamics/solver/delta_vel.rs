use crate::math::{AngVector, Real, Vector, JACOBIAN_DIM, SPATIAL_DIM};

/// Per-body velocity corrections computed by the solver.
///
/// The corrections are stored as six parallel arrays indexed by body: the linear x/y/z and
/// angular x/y/z components. They are zero-filled by [`DeltaVelocities::reset`] and must be
/// added to each body's pre-solve velocity by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DeltaVelocities {
    components: [Vec<Real>; SPATIAL_DIM],
}

impl DeltaVelocities {
    /// Creates zero velocity corrections for `body_count` bodies.
    pub fn new(body_count: usize) -> Self {
        let mut result = Self::default();
        result.reset(body_count);
        result
    }

    /// Resizes the arrays to `body_count` bodies and sets every correction to zero.
    pub fn reset(&mut self, body_count: usize) {
        for component in &mut self.components {
            component.clear();
            component.resize(body_count, 0.0);
        }
    }

    /// The number of bodies.
    pub fn len(&self) -> usize {
        self.components[0].len()
    }

    /// Is the body set empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The linear velocity correction of a body.
    pub fn linear(&self, body: usize) -> Vector<Real> {
        Vector::new(
            self.components[0][body],
            self.components[1][body],
            self.components[2][body],
        )
    }

    /// The angular velocity correction of a body.
    pub fn angular(&self, body: usize) -> AngVector<Real> {
        AngVector::new(
            self.components[3][body],
            self.components[4][body],
            self.components[5][body],
        )
    }

    /// The linear x corrections of all the bodies.
    pub fn linear_x(&self) -> &[Real] {
        &self.components[0]
    }

    /// The linear y corrections of all the bodies.
    pub fn linear_y(&self) -> &[Real] {
        &self.components[1]
    }

    /// The linear z corrections of all the bodies.
    pub fn linear_z(&self) -> &[Real] {
        &self.components[2]
    }

    /// The angular x corrections of all the bodies.
    pub fn angular_x(&self) -> &[Real] {
        &self.components[3]
    }

    /// The angular y corrections of all the bodies.
    pub fn angular_y(&self) -> &[Real] {
        &self.components[4]
    }

    /// The angular z corrections of all the bodies.
    pub fn angular_z(&self) -> &[Real] {
        &self.components[5]
    }

    /// The six arrays, in the order linear x/y/z then angular x/y/z.
    pub fn as_slices(&self) -> [&[Real]; SPATIAL_DIM] {
        [
            &self.components[0],
            &self.components[1],
            &self.components[2],
            &self.components[3],
            &self.components[4],
            &self.components[5],
        ]
    }

    /// Returns `true` if any correction is `NaN` or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.components
            .iter()
            .any(|component| component.iter().any(|e| !e.is_finite()))
    }

    #[inline]
    fn check_bodies(&self, body1: usize, body2: Option<usize>) {
        let len = self.len();
        assert!(
            body1 < len && body2.map_or(true, |b| b < len),
            "body index out of range: ({}, {:?}) with {} bodies",
            body1,
            body2,
            len
        );
    }

    /// The constraint-space velocity `G·Δv` of the bodies coupled by a constraint row.
    #[inline]
    pub(crate) fn project(&self, row: &[Real], body1: usize, body2: Option<usize>) -> Real {
        debug_assert_eq!(row.len(), JACOBIAN_DIM);
        self.check_bodies(body1, body2);
        let mut res = 0.0;
        for k in 0..SPATIAL_DIM {
            res += row[k] * self.components[k][body1];
        }
        if let Some(body2) = body2 {
            for k in 0..SPATIAL_DIM {
                res += row[SPATIAL_DIM + k] * self.components[k][body2];
            }
        }
        res
    }

    /// Adds `impulse · diag(minv) · row` to the corrections of the coupled bodies.
    #[inline]
    pub(crate) fn apply_impulse(
        &mut self,
        impulse: Real,
        row: &[Real],
        minv: &[Real],
        body1: usize,
        body2: Option<usize>,
    ) {
        debug_assert!(row.len() == JACOBIAN_DIM && minv.len() == JACOBIAN_DIM);
        self.check_bodies(body1, body2);
        for k in 0..SPATIAL_DIM {
            self.components[k][body1] += impulse * minv[k] * row[k];
        }
        if let Some(body2) = body2 {
            for k in 0..SPATIAL_DIM {
                let slot = SPATIAL_DIM + k;
                self.components[k][body2] += impulse * minv[slot] * row[slot];
            }
        }
    }
}
