use super::FemState;
use crate::base::Result;
use russell_lab::{Matrix, Vector};
use std::collections::HashMap;

/// Defines the interface of element models (local FE kernels)
///
/// Elements are stateless regarding material data: all secondary values live
/// in [`FemState`], so checkpoints are plain clones of the state.
pub trait ElementTrait {
    /// Returns the local-to-global map (stable DOF ids)
    fn local_to_global(&self) -> &Vec<usize>;

    /// Indicates whether the local stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Initializes/validates the material states (e.g., seeded initial stress)
    fn initialize_state(&mut self, state: &mut FemState) -> Result<()>;

    /// Computes the local stiffness matrix from the current material states
    fn stiffness(&mut self, kk: &mut Matrix, state: &FemState) -> Result<()>;

    /// Applies a global displacement increment to this element
    ///
    /// Extracts the local increment through the equation map, updates the
    /// material state of every integration point (side-effecting, NOT
    /// idempotent), and scatter-adds the resulting internal-force increment
    /// into `dff_int` (global, stable-id based).
    fn update(&mut self, state: &mut FemState, duu: &Vector, dff_int: &mut Vector) -> Result<()>;

    /// Scatter-adds the current internal-force resultant into `ff`
    ///
    /// Used by the deactivation procedure to build the equivalent nodal
    /// forces transferred to still-shared nodes.
    fn resultant(&mut self, state: &FemState, ff: &mut Vector) -> Result<()>;

    /// Returns the named scalar outputs at every integration point
    fn ip_values(&mut self, state: &FemState) -> Result<Vec<HashMap<String, f64>>>;
}
