use super::{LocalState, PlasticityTrait};
use crate::base::{Error, Result};
use crate::tensor::{LinElasticity, Tensor2, Tensor4};

/// Holds the index of the accumulated plastic multiplier internal value
const LAMBDA: usize = 0;

/// Implements the smooth Mohr-Coulomb plasticity model (principal-stress form)
///
/// ```text
/// f = (σ1 - σ3) + (σ1 + σ3) sin(φ) - 2 c cos(φ)
/// ```
///
/// with σ1 ≥ σ2 ≥ σ3 (tension positive). The yield gradient follows from the
/// eigenprojectors of the stress tensor; coincident principal values share
/// the eigenbasis returned by the spectral decomposition.
pub struct MohrCoulomb {
    /// Linear elasticity
    lin_elasticity: LinElasticity,

    /// Cohesion
    c: f64,

    /// sin(φ)
    sin_phi: f64,

    /// cos(φ)
    cos_phi: f64,
}

impl MohrCoulomb {
    /// Allocates a new instance (the friction angle is given in degrees)
    pub fn new(young: f64, poisson: f64, c: f64, phi: f64, plane_stress: bool) -> Result<Self> {
        if plane_stress {
            return Err(Error::validation("plasticity models do not work in plane-stress"));
        }
        if c <= 0.0 {
            return Err(Error::validation("c (cohesion) must be positive"));
        }
        if phi <= 0.0 || phi >= 90.0 {
            return Err(Error::validation("phi (friction angle) must be in (0, 90) degrees"));
        }
        let phi_rad = phi * std::f64::consts::PI / 180.0;
        Ok(MohrCoulomb {
            lin_elasticity: LinElasticity::new(young, poisson, false),
            c,
            sin_phi: f64::sin(phi_rad),
            cos_phi: f64::cos(phi_rad),
        })
    }
}

impl PlasticityTrait for MohrCoulomb {
    fn n_internal_values(&self) -> usize {
        1 // [accumulated plastic multiplier]
    }

    fn yield_function(&self, state: &LocalState) -> f64 {
        let (l, _) = state.stress.principal_values_and_projectors();
        (l[0] - l[2]) + (l[0] + l[2]) * self.sin_phi - 2.0 * self.c * self.cos_phi
    }

    fn df_dsigma(&self, df_dsigma: &mut Tensor2, state: &LocalState) -> Result<()> {
        let (_, pp) = state.stress.principal_values_and_projectors();
        df_dsigma.set_tensor(1.0 + self.sin_phi, &pp[0]);
        df_dsigma.update(self.sin_phi - 1.0, &pp[2]);
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
        // a compressive hydrostatic point is always inside the surface
        let m = f64::min(state.stress.invariant_sigma_m(), 0.0);
        let mut reference = Tensor2::new();
        reference.sym_set(0, 0, m);
        reference.sym_set(1, 1, m);
        reference.sym_set(2, 2, m);
        reference
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::MohrCoulomb;
    use crate::base::Error;
    use crate::material::{LocalState, PlasticityTrait};
    use crate::tensor::{t2_ddot_t2, Tensor2};
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            MohrCoulomb::new(1000.0, 0.3, 10.0, 30.0, true).err(),
            Some(Error::validation("plasticity models do not work in plane-stress"))
        );
        assert_eq!(
            MohrCoulomb::new(1000.0, 0.3, -1.0, 30.0, false).err(),
            Some(Error::validation("c (cohesion) must be positive"))
        );
        assert_eq!(
            MohrCoulomb::new(1000.0, 0.3, 10.0, 90.0, false).err(),
            Some(Error::validation("phi (friction angle) must be in (0, 90) degrees"))
        );
    }

    #[test]
    fn yield_function_matches_closed_form() {
        // φ = 30°, c = 10: f = (σ1-σ3) + (σ1+σ3)/2 - 10√3
        let model = MohrCoulomb::new(1000.0, 0.3, 10.0, 30.0, false).unwrap();
        let mut state = LocalState::new(1);
        state.stress.sym_set(0, 0, -5.0);
        state.stress.sym_set(1, 1, -20.0);
        state.stress.sym_set(2, 2, -10.0);
        let f = model.yield_function(&state);
        let correct = (-5.0 - (-20.0)) + (-5.0 + (-20.0)) * 0.5 - 2.0 * 10.0 * f64::sqrt(3.0) / 2.0;
        approx_eq(f, correct, 1e-12);
    }

    #[test]
    fn zero_stress_is_inside_the_surface() {
        let model = MohrCoulomb::new(1000.0, 0.3, 10.0, 30.0, false).unwrap();
        let state = LocalState::new(1);
        assert!(model.yield_function(&state) < 0.0);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let model = MohrCoulomb::new(1000.0, 0.3, 10.0, 30.0, false).unwrap();
        let mut state = LocalState::new(1);
        // distinct principal values with shear
        state.stress.sym_set(0, 0, -5.0);
        state.stress.sym_set(1, 1, -20.0);
        state.stress.sym_set(2, 2, -11.0);
        state.stress.sym_set(0, 1, 3.0);
        let mut n = Tensor2::new();
        model.df_dsigma(&mut n, &state).unwrap();
        let h = 1e-6;
        let mut aux = LocalState::new(1);
        for k in 0..6 {
            aux.mirror(&state);
            aux.stress.vec[k] = state.stress.vec[k] + h;
            let fp = model.yield_function(&aux);
            aux.stress.vec[k] = state.stress.vec[k] - h;
            let fm = model.yield_function(&aux);
            approx_eq(n.vec[k], (fp - fm) / (2.0 * h), 1e-5);
        }
    }

    #[test]
    fn interior_reference_is_strictly_inside() {
        let model = MohrCoulomb::new(1000.0, 0.3, 10.0, 30.0, false).unwrap();
        let mut state = LocalState::new(1);
        state.stress.sym_set(0, 0, 50.0);
        state.stress.sym_set(1, 1, -5.0);
        let reference = model.interior_reference(&state);
        let mut aux = LocalState::new(1);
        aux.stress.set_tensor(1.0, &reference);
        assert!(model.yield_function(&aux) < 0.0);
        // the reference is hydrostatic
        let mut dev = Tensor2::new();
        reference.deviator(&mut dev);
        approx_eq(t2_ddot_t2(&dev, &dev), 0.0, 1e-14);
    }
}
