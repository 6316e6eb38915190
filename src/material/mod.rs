//! Material models: per-integration-point constitutive updates
//!
//! A material point owns a [`LocalState`] (stress/strain in Mandel form,
//! internal variables, elastic/plastic flag). Models implement
//! [`StressStrainTrait`]; the plastic ones are driven by the shared explicit
//! return-mapping integrator in [`Elastoplastic`].

mod axial;
mod drucker_prager;
mod elastoplastic;
mod linear_elastic;
mod local_state;
mod mohr_coulomb;
mod stress_strain;
pub use crate::material::axial::*;
pub use crate::material::drucker_prager::*;
pub use crate::material::elastoplastic::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::local_state::*;
pub use crate::material::mohr_coulomb::*;
pub use crate::material::stress_strain::*;
