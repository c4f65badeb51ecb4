//! Miscellaneous utilities.

use crate::math::{AngVector, ConstraintRow, Real, Vector, JACOBIAN_DIM, SPATIAL_DIM};

/// The dot product of two constraint rows.
#[inline]
pub fn row_dot(a: &[Real], b: &[Real]) -> Real {
    debug_assert!(a.len() == JACOBIAN_DIM && b.len() == JACOBIAN_DIM);
    let mut res = 0.0;
    for k in 0..JACOBIAN_DIM {
        res += a[k] * b[k];
    }
    res
}

/// The dot product `a · diag(w) · b` of two constraint rows weighted by a diagonal.
#[inline]
pub fn row_weighted_dot(a: &[Real], w: &[Real], b: &[Real]) -> Real {
    debug_assert!(a.len() == JACOBIAN_DIM && w.len() == JACOBIAN_DIM && b.len() == JACOBIAN_DIM);
    let mut res = 0.0;
    for k in 0..JACOBIAN_DIM {
        res += a[k] * w[k] * b[k];
    }
    res
}

/// Assembles a constraint row from the linear and angular blocks of two bodies.
#[inline]
pub fn assemble_row(
    linear1: &Vector<Real>,
    angular1: &AngVector<Real>,
    linear2: &Vector<Real>,
    angular2: &AngVector<Real>,
) -> ConstraintRow {
    let mut row = [0.0; JACOBIAN_DIM];
    row[0..3].copy_from_slice(linear1.as_slice());
    row[3..6].copy_from_slice(angular1.as_slice());
    row[SPATIAL_DIM..SPATIAL_DIM + 3].copy_from_slice(linear2.as_slice());
    row[SPATIAL_DIM + 3..].copy_from_slice(angular2.as_slice());
    row
}

/// Returns `true` if every entry of the row is finite.
#[inline]
pub fn row_is_finite(row: &[Real]) -> bool {
    row.iter().all(|e| e.is_finite())
}
