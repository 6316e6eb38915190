use super::{output_stress_values, LocalState, StressStrainTrait};
use crate::base::{Error, Result, BISECTION_NMAX, DRIFT_TOL, N_SUBINCREMENT, YIELD_TOL};
use crate::tensor::{t2_ddot_t2, t4_ddot_t2, t4_ddot_t2_dyad_t2_ddot_t4, Tensor2, Tensor4};
use std::collections::HashMap;

/// Defines the interface of yield-surface models driven by [`Elastoplastic`]
pub trait PlasticityTrait {
    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize;

    /// Calculates the yield function f at the current state
    fn yield_function(&self, state: &LocalState) -> f64;

    /// Calculates the derivative of the yield function w.r.t. stress
    fn df_dsigma(&self, df_dsigma: &mut Tensor2, state: &LocalState) -> Result<()>;

    /// Returns the (generalized) hardening modulus H at the current state
    fn hardening_modulus(&self, state: &LocalState) -> f64;

    /// Updates the internal values given the plastic multiplier increment
    fn update_internal_values(&self, state: &mut LocalState, dlambda: f64);

    /// Returns the elastic rigidity modulus
    fn elastic_rigidity(&self) -> &Tensor4;

    /// Returns a stress state strictly inside the yield surface
    ///
    /// The drift correction projects the stress toward this reference point
    /// (typically on the hydrostatic axis).
    fn interior_reference(&self, state: &LocalState) -> Tensor2;
}

/// Integrates elastoplastic models by explicit sub-incrementation
///
/// The stress update follows the classical sequence: entry-state check,
/// elastic trial, bisection to the elastic/plastic intersection, explicit
/// sub-incremental integration with the elastoplastic tangent, and a final
/// drift correction pulling the stress back to the yield surface.
pub struct Elastoplastic {
    /// Actual yield-surface model
    model: Box<dyn PlasticityTrait>,

    /// Number of sub-increments of the plastic integrator
    n_subincrement: usize,

    /// Workspace: yield function gradient
    df_dsigma: Tensor2,

    /// Workspace: elastic stress increment
    dsig_e: Tensor2,

    /// Workspace: auxiliary state for trial evaluations
    aux: LocalState,
}

impl Elastoplastic {
    /// Allocates a new instance
    pub fn new(model: Box<dyn PlasticityTrait>) -> Self {
        let n_internal_values = model.n_internal_values();
        Elastoplastic {
            model,
            n_subincrement: N_SUBINCREMENT,
            df_dsigma: Tensor2::new(),
            dsig_e: Tensor2::new(),
            aux: LocalState::new(n_internal_values),
        }
    }

    /// Locates `t` in `[0, 1]` such that `f(σa + t·(σb - σa)) ≈ 0` by bisection
    ///
    /// The yield values at the endpoints must straddle zero.
    fn bisect_intersection(&mut self, state: &LocalState, sig_a: &Tensor2, sig_b: &Tensor2) -> Result<f64> {
        self.aux.mirror(state);
        self.aux.stress.set_tensor(1.0, sig_a);
        let fa = self.model.yield_function(&self.aux);
        self.aux.stress.set_tensor(1.0, sig_b);
        let fb = self.model.yield_function(&self.aux);
        if fa * fb > 0.0 {
            return Err(Error::convergence(0, fa, "bisection endpoints do not straddle the yield surface"));
        }
        let (mut ta, mut tb) = (0.0, 1.0);
        for it in 0..BISECTION_NMAX {
            let tm = 0.5 * (ta + tb);
            for i in 0..6 {
                self.aux.stress.vec[i] = sig_a.vec[i] + tm * (sig_b.vec[i] - sig_a.vec[i]);
            }
            let fm = self.model.yield_function(&self.aux);
            if fm.abs() <= DRIFT_TOL {
                return Ok(tm);
            }
            if fa * fm < 0.0 {
                tb = tm;
            } else {
                ta = tm;
            }
            if tb - ta < 1e-15 {
                return Ok(tm);
            }
            if it == BISECTION_NMAX - 1 {
                return Err(Error::convergence(it, fm, "bisection did not converge onto the yield surface"));
            }
        }
        unreachable!()
    }
}

impl StressStrainTrait for Elastoplastic {
    fn symmetric_stiffness(&self) -> bool {
        true // associated flow rule throughout
    }

    fn n_internal_values(&self) -> usize {
        self.model.n_internal_values()
    }

    fn initialize_internal_values(&self, state: &mut LocalState) -> Result<()> {
        let f = self.model.yield_function(state);
        if f > YIELD_TOL {
            return Err(Error::state(f, "initial stress state is outside the yield surface"));
        }
        Ok(())
    }

    fn yield_value(&self, state: &LocalState) -> f64 {
        self.model.yield_function(state)
    }

    fn stiffness(&mut self, dd: &mut Tensor4, state: &LocalState) -> Result<()> {
        let dde = self.model.elastic_rigidity();
        if state.elastic {
            dd.set_tensor(1.0, dde);
            return Ok(());
        }
        self.model.df_dsigma(&mut self.df_dsigma, state)?;
        let n = &self.df_dsigma;
        let hh = self.model.hardening_modulus(state);
        let phi = crate::tensor::t2_ddot_t4_ddot_t2(n, dde, n) + hh;
        if phi.abs() < 1e-12 {
            return Err(Error::convergence(0, phi, "plastic denominator is too small"));
        }
        // Dep = De - (De:n)⊗(n:De) / (n:De:n + H)
        t4_ddot_t2_dyad_t2_ddot_t4(dd, 1.0, dde, -1.0 / phi, n, n);
        Ok(())
    }

    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()> {
        // entry-state check
        let f0 = self.model.yield_function(state);
        if f0 > YIELD_TOL {
            return Err(Error::state(f0, "stress state is outside the yield surface at the start of the update"));
        }

        // elastic trial
        t4_ddot_t2(&mut self.dsig_e, 1.0, self.model.elastic_rigidity(), delta_strain);
        self.aux.mirror(state);
        self.aux.stress.update(1.0, &self.dsig_e);
        let f_trial = self.model.yield_function(&self.aux);
        if f_trial <= 0.0 {
            state.stress.update(1.0, &self.dsig_e);
            state.strain.update(1.0, delta_strain);
            state.elastic = true;
            return Ok(());
        }

        // locate the elastic/plastic intersection
        let mut a = 0.0;
        if f0 < -YIELD_TOL {
            let sig_a = state.stress.clone();
            let mut sig_b = state.stress.clone();
            sig_b.update(1.0, &self.dsig_e);
            a = self.bisect_intersection(state, &sig_a, &sig_b)?;
            state.stress.update(a, &self.dsig_e);
            state.strain.update(a, delta_strain);
        }

        // integrate the remaining plastic strain in explicit sub-increments
        let scale = (1.0 - a) / (self.n_subincrement as f64);
        let mut ddeps = Tensor2::new();
        ddeps.set_tensor(scale, delta_strain);
        let mut dsig = Tensor2::new();
        let mut dde_n = Tensor2::new();
        for _ in 0..self.n_subincrement {
            self.model.df_dsigma(&mut self.df_dsigma, state)?;
            let n = &self.df_dsigma;
            let dde = self.model.elastic_rigidity();
            let hh = self.model.hardening_modulus(state);
            t4_ddot_t2(&mut dde_n, 1.0, dde, n);
            let phi = t2_ddot_t2(n, &dde_n) + hh;
            if phi.abs() < 1e-12 {
                return Err(Error::convergence(0, phi, "plastic denominator is too small"));
            }
            t4_ddot_t2(&mut dsig, 1.0, dde, &ddeps);
            let dlambda = f64::max(0.0, t2_ddot_t2(&dde_n, &ddeps) / phi);
            // Δσ = De:Δε - Δλ De:n
            dsig.update(-dlambda, &dde_n);
            state.stress.update(1.0, &dsig);
            state.strain.update(1.0, &ddeps);
            self.model.update_internal_values(state, dlambda);
        }

        // drift correction
        let f_end = self.model.yield_function(state);
        if f_end > DRIFT_TOL {
            let reference = self.model.interior_reference(state);
            let sig_b = state.stress.clone();
            let t = self.bisect_intersection(state, &reference, &sig_b)?;
            for i in 0..6 {
                state.stress.vec[i] = reference.vec[i] + t * (sig_b.vec[i] - reference.vec[i]);
            }
        }

        state.elastic = false;
        Ok(())
    }

    fn output_values(&self, map: &mut HashMap<String, f64>, state: &LocalState) {
        output_stress_values(map, state);
        map.insert("yield".to_string(), self.model.yield_function(state));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Elastoplastic;
    use crate::base::{Error, YIELD_TOL};
    use crate::material::{LocalState, MohrCoulomb, StressStrainTrait};
    use crate::tensor::Tensor2;
    use russell_lab::approx_eq;

    fn sample_model() -> Elastoplastic {
        Elastoplastic::new(Box::new(MohrCoulomb::new(10_000.0, 0.3, 10.0, 30.0, false).unwrap()))
    }

    #[test]
    fn entry_state_check_fails_with_state_error() {
        let mut model = sample_model();
        let mut state = LocalState::new(model.n_internal_values());
        // uniaxial tension far outside the yield surface
        state.stress.sym_set(0, 0, 1000.0);
        let mut deps = Tensor2::new();
        deps.sym_set(0, 0, 1e-4);
        let res = model.update_stress(&mut state, &deps);
        match res.err().unwrap() {
            Error::State { yield_value, .. } => assert!(yield_value > YIELD_TOL),
            _ => panic!("expected a State error"),
        }
    }

    #[test]
    fn elastic_step_stays_elastic() {
        let mut model = sample_model();
        let mut state = LocalState::new(model.n_internal_values());
        let mut deps = Tensor2::new();
        deps.sym_set(0, 0, -1e-5);
        deps.sym_set(1, 1, -1e-5);
        deps.sym_set(2, 2, -1e-5);
        model.update_stress(&mut state, &deps).unwrap();
        assert!(state.elastic);
        assert!(model.yield_value(&state) < 0.0);
    }

    #[test]
    fn plastic_step_returns_to_the_yield_surface() {
        let mut model = sample_model();
        let mut state = LocalState::new(model.n_internal_values());
        // large shear strain increment pushing far beyond the surface
        let mut deps = Tensor2::new();
        deps.sym_set(0, 1, 0.01);
        model.update_stress(&mut state, &deps).unwrap();
        assert!(!state.elastic);
        let f = model.yield_value(&state);
        assert!(f <= 1e-4, "f = {} must be within tolerance", f);
    }

    #[test]
    fn stiffness_switches_between_branches() {
        let mut model = sample_model();
        let mut state = LocalState::new(model.n_internal_values());
        let mut dd = crate::tensor::Tensor4::new();
        model.stiffness(&mut dd, &state).unwrap();
        let d33_elastic = dd.mat.get(3, 3);
        // drive the point to the plastic branch by shearing
        let mut deps = Tensor2::new();
        deps.sym_set(0, 1, 0.01);
        model.update_stress(&mut state, &deps).unwrap();
        model.stiffness(&mut dd, &state).unwrap();
        assert!(dd.mat.get(3, 3) < d33_elastic);
        // the tangent annihilates stress rates along the yield gradient:
        // n : Dep : n = 0
        let mut n = Tensor2::new();
        use super::PlasticityTrait;
        let mc = MohrCoulomb::new(10_000.0, 0.3, 10.0, 30.0, false).unwrap();
        mc.df_dsigma(&mut n, &state).unwrap();
        approx_eq(crate::tensor::t2_ddot_t4_ddot_t2(&n, &dd, &n), 0.0, 1e-6);
    }
}
