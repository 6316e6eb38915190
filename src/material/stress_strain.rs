use super::{DruckerPrager, Elastoplastic, LinearElastic, LocalState, MohrCoulomb};
use crate::base::{ParamStressStrain, Result};
use crate::tensor::{Tensor2, Tensor4};
use std::collections::HashMap;

/// Defines the interface of stress-strain (constitutive) models
pub trait StressStrainTrait {
    /// Indicates whether the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize;

    /// Initializes the internal values for a (possibly non-zero) initial stress
    ///
    /// Fails when the initial stress violates the yield condition.
    fn initialize_internal_values(&self, state: &mut LocalState) -> Result<()>;

    /// Evaluates the yield function at the current state
    ///
    /// Purely elastic models return negative infinity.
    fn yield_value(&self, state: &LocalState) -> f64;

    /// Computes the tangent stiffness
    ///
    /// Returns the elastic rigidity when the state is elastic and the
    /// consistent elastoplastic tangent otherwise.
    fn stiffness(&mut self, dd: &mut Tensor4, state: &LocalState) -> Result<()>;

    /// Integrates a strain increment into the stress state (side-effecting)
    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()>;

    /// Collects named scalar outputs for reporting (read-only)
    fn output_values(&self, map: &mut HashMap<String, f64>, state: &LocalState);
}

/// Writes the standard stress/strain outputs shared by all solid models
pub(crate) fn output_stress_values(map: &mut HashMap<String, f64>, state: &LocalState) {
    map.insert("sig_xx".to_string(), state.stress.get(0, 0));
    map.insert("sig_yy".to_string(), state.stress.get(1, 1));
    map.insert("sig_zz".to_string(), state.stress.get(2, 2));
    map.insert("sig_xy".to_string(), state.stress.get(0, 1));
    map.insert("sig_yz".to_string(), state.stress.get(1, 2));
    map.insert("sig_zx".to_string(), state.stress.get(0, 2));
    map.insert("sig_m".to_string(), state.stress.invariant_sigma_m());
    map.insert("sig_d".to_string(), state.stress.invariant_sigma_d());
    map.insert("eps_v".to_string(), state.strain.trace());
    map.insert("plastic".to_string(), if state.elastic { 0.0 } else { 1.0 });
}

/// Allocates a stress-strain model from validated parameters
pub fn new_stress_strain_model(param: &ParamStressStrain, plane_stress: bool) -> Result<Box<dyn StressStrainTrait>> {
    param.validate()?;
    let model: Box<dyn StressStrainTrait> = match param {
        ParamStressStrain::LinearElastic { young, poisson } => {
            Box::new(LinearElastic::new(*young, *poisson, plane_stress))
        }
        ParamStressStrain::MohrCoulomb { young, poisson, c, phi } => Box::new(Elastoplastic::new(Box::new(
            MohrCoulomb::new(*young, *poisson, *c, *phi, plane_stress)?,
        ))),
        ParamStressStrain::DruckerPrager {
            young,
            poisson,
            c,
            phi,
            ten_max,
        } => Box::new(Elastoplastic::new(Box::new(DruckerPrager::new(
            *young,
            *poisson,
            *c,
            *phi,
            *ten_max,
            plane_stress,
        )?))),
    };
    Ok(model)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
