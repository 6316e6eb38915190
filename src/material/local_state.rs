use crate::tensor::Tensor2;
use serde::{Deserialize, Serialize};

/// Holds the state of a material point (stress, strain, internal variables)
///
/// The stress and strain tensors persist across increments within a stage;
/// they are checkpointed and rolled back only by the capacity search.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalState {
    /// Stress tensor (Mandel components)
    pub stress: Tensor2,

    /// Strain tensor (Mandel components)
    pub strain: Tensor2,

    /// Elastic flag (false means the point is on the plastic branch)
    pub elastic: bool,

    /// Model-specific internal (hardening) variables
    pub internal_values: Vec<f64>,
}

impl LocalState {
    /// Allocates a new instance with zero stress/strain
    pub fn new(n_internal_values: usize) -> Self {
        LocalState {
            stress: Tensor2::new(),
            strain: Tensor2::new(),
            elastic: true,
            internal_values: vec![0.0; n_internal_values],
        }
    }

    /// Copies another state into this one
    pub fn mirror(&mut self, other: &LocalState) {
        self.stress.set_tensor(1.0, &other.stress);
        self.strain.set_tensor(1.0, &other.strain);
        self.elastic = other.elastic;
        self.internal_values.copy_from_slice(&other.internal_values);
    }
}

/// Holds the state of a one-dimensional (bar/joint) material point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AxialState {
    /// Axial (or tangential) stress
    pub sig: f64,

    /// Axial (or tangential) strain
    pub eps: f64,

    /// Accumulated plastic strain magnitude
    pub eps_p: f64,

    /// Elastic flag
    pub elastic: bool,
}

impl AxialState {
    /// Allocates a new zeroed instance
    pub fn new() -> Self {
        AxialState {
            sig: 0.0,
            eps: 0.0,
            eps_p: 0.0,
            elastic: true,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
