/// Tolerance to accept a stress state as lying on/inside the yield surface
///
/// This value gates the entry check of the stress update: a material point
/// whose yield function exceeds this tolerance cannot start a new increment.
pub const YIELD_TOL: f64 = 1e-4;

/// Target yield-function magnitude after the drift correction
///
/// Kept one order of magnitude below [`YIELD_TOL`] so that a corrected state
/// always passes the entry check of the next increment.
pub const DRIFT_TOL: f64 = 1e-5;

/// Default number of explicit sub-increments in the plastic integrator
pub const N_SUBINCREMENT: usize = 16;

/// Maximum number of bisection iterations (yield-surface intersection and
/// drift correction)
pub const BISECTION_NMAX: usize = 80;

/// Maximum number of Newton iterations for the inverse mapping of joints
pub const INVERSE_MAP_NMAX: usize = 30;

/// Tolerance for the inverse-mapping Newton solve (physical coordinates)
pub const INVERSE_MAP_TOL: f64 = 1e-8;

/// Residual magnitude treated as a divergence signal by the nonlinear solver
pub const RESIDUAL_BLOWUP: f64 = 1e10;
