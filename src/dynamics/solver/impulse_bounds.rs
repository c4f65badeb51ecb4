use crate::math::Real;

/// One side of the admissible impulse range of a constraint.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ImpulseBound {
    /// The impulse is not limited on this side.
    Unbounded,
    /// The impulse is limited by this value.
    Bounded(Real),
}

impl ImpulseBound {
    /// Converts a raw bound where `NaN` means "no bound".
    ///
    /// Infinite values are kept as bounds: they never clamp anything.
    pub fn from_raw(value: Real) -> Self {
        if value.is_nan() {
            ImpulseBound::Unbounded
        } else {
            ImpulseBound::Bounded(value)
        }
    }

    /// The bound value, if any.
    pub fn value(&self) -> Option<Real> {
        match *self {
            ImpulseBound::Unbounded => None,
            ImpulseBound::Bounded(value) => Some(value),
        }
    }

    /// Is there a bound on this side?
    pub fn is_bounded(&self) -> bool {
        matches!(self, ImpulseBound::Bounded(_))
    }
}

/// The admissible range `[lower, upper]` of a constraint impulse.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ImpulseBounds {
    /// The lower bound of the impulse.
    pub lower: ImpulseBound,
    /// The upper bound of the impulse.
    pub upper: ImpulseBound,
}

impl ImpulseBounds {
    /// Bounds of a bilateral constraint: the impulse can take any value.
    pub const UNBOUNDED: Self = Self {
        lower: ImpulseBound::Unbounded,
        upper: ImpulseBound::Unbounded,
    };

    /// Creates bounds from two sides.
    pub fn new(lower: ImpulseBound, upper: ImpulseBound) -> Self {
        Self { lower, upper }
    }

    /// Creates bounds from raw values where `NaN` means "no bound" on that side.
    pub fn from_raw(lower: Real, upper: Real) -> Self {
        Self::new(ImpulseBound::from_raw(lower), ImpulseBound::from_raw(upper))
    }

    /// Bounds of a one-sided constraint that can only push: `[0, +∞]`.
    pub fn unilateral() -> Self {
        Self::new(
            ImpulseBound::Bounded(0.0),
            ImpulseBound::Bounded(Real::INFINITY),
        )
    }

    /// Projects an accumulated impulse onto these bounds.
    ///
    /// The lower bound is checked first. The two checks are exclusive as long as the bounds
    /// are not inverted.
    #[inline]
    pub fn clamp(&self, impulse: Real) -> Real {
        if let ImpulseBound::Bounded(lower) = self.lower {
            if impulse < lower {
                return lower;
            }
        }

        if let ImpulseBound::Bounded(upper) = self.upper {
            if impulse > upper {
                return upper;
            }
        }

        impulse
    }

    /// Returns `true` if both sides are bounded and `lower > upper`.
    pub fn is_inverted(&self) -> bool {
        match (self.lower, self.upper) {
            (ImpulseBound::Bounded(lower), ImpulseBound::Bounded(upper)) => lower > upper,
            _ => false,
        }
    }
}

impl Default for ImpulseBounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
