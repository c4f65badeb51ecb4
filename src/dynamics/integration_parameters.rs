use crate::math::Real;

/// The SPOOK stabilization parameters shared by every constraint.
///
/// A single set of parameters applies to all the constraints of a step: soft joints and
/// rigid contacts cannot have different stiffness or damping.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SpookParameters {
    /// Coefficient applied to the constraint violation `G·q` when computing the bias.
    pub a: Real,
    /// Coefficient applied to the constraint velocity `G·W` when computing the bias.
    pub b: Real,
    /// Regularization added to the diagonal of the constraint-space inverse mass.
    ///
    /// This must be strictly positive for constraints with a zero effective inverse mass.
    pub eps: Real,
    /// The constraint stiffness `k` used to derive the coefficients (`0.0` if the
    /// coefficients were set directly).
    pub stiffness: Real,
    /// The number of timesteps `d` needed to relax a constraint violation (`0.0` if
    /// the coefficients were set directly).
    pub relaxation: Real,
}

impl SpookParameters {
    /// Derives the SPOOK coefficients from a stiffness, a relaxation and a timestep length.
    ///
    /// - `a = 4 / (dt (1 + 4 d))`
    /// - `b = 4 d / (1 + 4 d)`
    /// - `eps = 4 / (dt² k (1 + 4 d))`
    pub fn new(stiffness: Real, relaxation: Real, dt: Real) -> Self {
        let denom = 1.0 + 4.0 * relaxation;
        Self {
            a: 4.0 / (dt * denom),
            b: 4.0 * relaxation / denom,
            eps: 4.0 / (dt * dt * stiffness * denom),
            stiffness,
            relaxation,
        }
    }

    /// Sets the SPOOK coefficients directly.
    pub fn from_coefficients(a: Real, b: Real, eps: Real) -> Self {
        Self {
            a,
            b,
            eps,
            stiffness: 0.0,
            relaxation: 0.0,
        }
    }

    /// Whether these coefficients were derived from a stiffness and a relaxation.
    pub fn is_derived(&self) -> bool {
        self.stiffness > 0.0
    }
}

/// Parameters for a time-step of the constraint solver.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct IntegrationParameters {
    /// The timestep length `h` (default: `1.0 / 60.0`).
    pub dt: Real,
    /// The number of projected Gauss-Seidel sweeps run over all the constraints (default: `10`).
    ///
    /// Setting this to zero leaves every velocity correction at zero.
    pub num_solver_iterations: usize,
    /// The SPOOK stabilization parameters (default: stiffness `1.0e7`, relaxation `3.0`).
    pub spook: SpookParameters,
}

impl IntegrationParameters {
    /// The default constraint stiffness.
    pub const DEFAULT_STIFFNESS: Real = 1.0e7;
    /// The default constraint relaxation, in timesteps.
    pub const DEFAULT_RELAXATION: Real = 3.0;

    /// Parameters with the given timestep and iteration count, and the default SPOOK stiffness
    /// and relaxation.
    pub fn new(dt: Real, num_solver_iterations: usize) -> Self {
        Self {
            dt,
            num_solver_iterations,
            spook: SpookParameters::new(Self::DEFAULT_STIFFNESS, Self::DEFAULT_RELAXATION, dt),
        }
    }

    /// The inverse of the time-stepping length, i.e. the steps per seconds (Hz).
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> Real {
        if self.dt == 0.0 {
            0.0
        } else {
            1.0 / self.dt
        }
    }

    /// Sets the time-stepping length.
    ///
    /// If the SPOOK coefficients were derived from a stiffness and relaxation, they are
    /// derived again for the new timestep.
    #[inline]
    pub fn set_dt(&mut self, dt: Real) {
        assert!(dt >= 0.0, "The time-stepping length cannot be negative.");
        self.dt = dt;

        if self.spook.is_derived() {
            self.spook = SpookParameters::new(self.spook.stiffness, self.spook.relaxation, dt);
        }
    }

    /// Sets the SPOOK stiffness and relaxation, deriving the coefficients for the current timestep.
    pub fn set_spook_params(&mut self, stiffness: Real, relaxation: Real) {
        self.spook = SpookParameters::new(stiffness, relaxation, self.dt);
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spook_coefficients_from_stiffness_and_relaxation() {
        let dt = 1.0 / 60.0;
        let spook = SpookParameters::new(1.0e7, 3.0, dt);

        assert_relative_eq!(spook.a, 4.0 / (dt * 13.0), epsilon = 1.0e-4);
        assert_relative_eq!(spook.b, 12.0 / 13.0, epsilon = 1.0e-6);
        assert_relative_eq!(spook.eps, 4.0 / (dt * dt * 1.0e7 * 13.0), epsilon = 1.0e-9);
        assert!(spook.is_derived());
    }

    #[test]
    fn explicit_coefficients_are_kept_on_dt_change() {
        let mut params = IntegrationParameters {
            spook: SpookParameters::from_coefficients(0.1, 0.1, 1.0e-4),
            ..IntegrationParameters::default()
        };
        params.set_dt(1.0 / 120.0);

        assert_eq!(params.spook, SpookParameters::from_coefficients(0.1, 0.1, 1.0e-4));
        assert_relative_eq!(params.inv_dt(), 120.0, epsilon = 1.0e-3);
    }

    #[test]
    fn derived_coefficients_follow_dt() {
        let mut params = IntegrationParameters::default();
        params.set_dt(1.0 / 30.0);

        let expected = SpookParameters::new(
            IntegrationParameters::DEFAULT_STIFFNESS,
            IntegrationParameters::DEFAULT_RELAXATION,
            1.0 / 30.0,
        );
        assert_eq!(params.spook, expected);
    }

    #[test]
    fn default_parameters() {
        let params = IntegrationParameters::default();
        assert_eq!(params.num_solver_iterations, 10);
        assert_relative_eq!(params.dt, 1.0 / 60.0);
        assert!(params.spook.eps > 0.0);
    }

    #[test]
    fn zero_dt_has_zero_inverse() {
        let params = IntegrationParameters {
            dt: 0.0,
            ..IntegrationParameters::default()
        };
        assert_eq!(params.inv_dt(), 0.0);
    }
}
