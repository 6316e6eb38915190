//! Common definitions: errors, enums, parameters, control settings

mod constants;
mod control;
mod enums;
mod error;
mod parameters;
mod sample_meshes;
pub use crate::base::constants::*;
pub use crate::base::control::*;
pub use crate::base::enums::*;
pub use crate::base::error::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
