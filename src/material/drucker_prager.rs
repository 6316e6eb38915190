use super::{LocalState, PlasticityTrait};
use crate::base::{Error, Result};
use crate::tensor::{LinElasticity, Tensor2, Tensor4};

/// Holds the index of the accumulated plastic multiplier internal value
const LAMBDA: usize = 0;

/// Deviatoric norm below which the cone gradient degenerates to the apex
const APEX_TOL: f64 = 1e-12;

/// Implements the Drucker-Prager model with a hydrostatic tension cut-off
///
/// ```text
/// f_cone = √J2 + α I1 - κ
/// f_cut  = σm - t_max
/// f      = max(f_cone, f_cut)
/// ```
///
/// where α and κ match the Mohr-Coulomb parameters on the compressive
/// meridian.
pub struct DruckerPrager {
    /// Linear elasticity
    lin_elasticity: LinElasticity,

    /// Slope of the cone in (I1, √J2) space
    alpha: f64,

    /// Size of the cone at zero mean stress
    kappa: f64,

    /// Mean-stress limit of the tension cut-off
    ten_max: f64,
}

impl DruckerPrager {
    /// Allocates a new instance (the friction angle is given in degrees)
    pub fn new(young: f64, poisson: f64, c: f64, phi: f64, ten_max: f64, plane_stress: bool) -> Result<Self> {
        if plane_stress {
            return Err(Error::validation("plasticity models do not work in plane-stress"));
        }
        if c <= 0.0 {
            return Err(Error::validation("c (cohesion) must be positive"));
        }
        if phi <= 0.0 || phi >= 90.0 {
            return Err(Error::validation("phi (friction angle) must be in (0, 90) degrees"));
        }
        if ten_max < 0.0 {
            return Err(Error::validation("ten_max (tension cut-off) must not be negative"));
        }
        let phi_rad = phi * std::f64::consts::PI / 180.0;
        let (sin_phi, cos_phi) = (f64::sin(phi_rad), f64::cos(phi_rad));
        let den = f64::sqrt(3.0) * (3.0 - sin_phi);
        Ok(DruckerPrager {
            lin_elasticity: LinElasticity::new(young, poisson, false),
            alpha: 2.0 * sin_phi / den,
            kappa: 6.0 * c * cos_phi / den,
            ten_max,
        })
    }

    /// Returns √J2 of the deviatoric stress
    fn sqrt_j2(stress: &Tensor2) -> f64 {
        let mut s = Tensor2::new();
        stress.deviator(&mut s);
        s.norm() / std::f64::consts::SQRT_2
    }

    /// Returns the cone and cut-off yield values
    fn yield_values(&self, stress: &Tensor2) -> (f64, f64) {
        let f_cone = DruckerPrager::sqrt_j2(stress) + self.alpha * stress.trace() - self.kappa;
        let f_cut = stress.invariant_sigma_m() - self.ten_max;
        (f_cone, f_cut)
    }
}

impl PlasticityTrait for DruckerPrager {
    fn n_internal_values(&self) -> usize {
        1 // [accumulated plastic multiplier]
    }

    fn yield_function(&self, state: &LocalState) -> f64 {
        let (f_cone, f_cut) = self.yield_values(&state.stress);
        f64::max(f_cone, f_cut)
    }

    fn df_dsigma(&self, df_dsigma: &mut Tensor2, state: &LocalState) -> Result<()> {
        let (f_cone, f_cut) = self.yield_values(&state.stress);
        df_dsigma.clear();
        if f_cut >= f_cone {
            // dσm/dσ = I/3
            for i in 0..3 {
                df_dsigma.vec[i] = 1.0 / 3.0;
            }
            return Ok(());
        }
        let sqrt_j2 = DruckerPrager::sqrt_j2(&state.stress);
        if sqrt_j2 > APEX_TOL {
            // d√J2/dσ = s / (2 √J2)
            let mut s = Tensor2::new();
            state.stress.deviator(&mut s);
            df_dsigma.update(0.5 / sqrt_j2, &s);
        }
        // dI1/dσ = I
        for i in 0..3 {
            df_dsigma.vec[i] += self.alpha;
        }
        Ok(())
    }

    fn hardening_modulus(&self, _state: &LocalState) -> f64 {
        0.0 // perfect plasticity
    }

    fn update_internal_values(&self, state: &mut LocalState, dlambda: f64) {
        state.internal_values[LAMBDA] += dlambda;
    }

    fn elastic_rigidity(&self) -> &Tensor4 {
        self.lin_elasticity.get_modulus()
    }

    fn interior_reference(&self, state: &LocalState) -> Tensor2 {
        // hydrostatic point strictly inside both the cone and the cut-off
        let m_cur = state.stress.invariant_sigma_m();
        let m = f64::min(m_cur, f64::min(0.0, self.ten_max)) - self.kappa / (6.0 * self.alpha);
        let mut reference = Tensor2::new();
        reference.sym_set(0, 0, m);
        reference.sym_set(1, 1, m);
        reference.sym_set(2, 2, m);
        reference
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
