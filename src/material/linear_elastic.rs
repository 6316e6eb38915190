use super::{output_stress_values, LocalState, StressStrainTrait};
use crate::base::Result;
use crate::tensor::{t4_ddot_t2_update, LinElasticity, Tensor2, Tensor4};
use std::collections::HashMap;

/// Implements the linear elastic model
pub struct LinearElastic {
    /// Linear elasticity
    lin_elasticity: LinElasticity,
}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new(young: f64, poisson: f64, plane_stress: bool) -> Self {
        LinearElastic {
            lin_elasticity: LinElasticity::new(young, poisson, plane_stress),
        }
    }
}

impl StressStrainTrait for LinearElastic {
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn n_internal_values(&self) -> usize {
        0
    }

    fn initialize_internal_values(&self, _state: &mut LocalState) -> Result<()> {
        Ok(())
    }

    fn yield_value(&self, _state: &LocalState) -> f64 {
        f64::NEG_INFINITY
    }

    fn stiffness(&mut self, dd: &mut Tensor4, _state: &LocalState) -> Result<()> {
        dd.set_tensor(1.0, self.lin_elasticity.get_modulus());
        Ok(())
    }

    fn update_stress(&mut self, state: &mut LocalState, delta_strain: &Tensor2) -> Result<()> {
        t4_ddot_t2_update(&mut state.stress, 1.0, self.lin_elasticity.get_modulus(), delta_strain);
        state.strain.update(1.0, delta_strain);
        state.elastic = true;
        Ok(())
    }

    fn output_values(&self, map: &mut HashMap<String, f64>, state: &LocalState) {
        output_stress_values(map, state);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
