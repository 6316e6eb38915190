//! Finite element kernels, DOF numbering, and the nonlinear solver

mod base;
mod capacity;
mod dofs;
mod element_joint;
mod element_porous;
mod element_rod;
mod element_seepage;
mod element_solid;
mod element_trait;
mod elements;
mod equations;
mod essential;
mod linear_system;
mod natural;
mod output;
mod solver;
mod state;
pub use crate::fem::base::*;
pub use crate::fem::capacity::*;
pub use crate::fem::dofs::*;
pub use crate::fem::element_joint::*;
pub use crate::fem::element_porous::*;
pub use crate::fem::element_rod::*;
pub use crate::fem::element_seepage::*;
pub use crate::fem::element_solid::*;
pub use crate::fem::element_trait::*;
pub use crate::fem::elements::*;
pub use crate::fem::equations::*;
pub use crate::fem::essential::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::natural::*;
pub use crate::fem::output::*;
pub use crate::fem::solver::*;
pub use crate::fem::state::*;
