//! Shape functions, quadrature rules, and reference-geometry operations
//!
//! This module implements the interface consumed by the element kernels:
//! interpolation functions and their local derivatives for a closed set of
//! geometry kinds, Gauss integration rules, least-squares extrapolation
//! matrices (integration points to nodes), and a scratchpad holding the
//! per-element geometry operations (Jacobian, Cartesian gradients, inverse
//! mapping).

mod extrapolation;
mod kinds;
mod pad;
mod quadrature;
pub use crate::shapes::extrapolation::*;
pub use crate::shapes::kinds::*;
pub use crate::shapes::pad::*;
pub use crate::shapes::quadrature::*;
