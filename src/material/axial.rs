use super::AxialState;
use crate::base::{Error, Result, YIELD_TOL};

/// Implements one-dimensional (bar/joint) plasticity with linear hardening
///
/// ```text
/// f = |σ| - (σy + H εp)
/// ```
///
/// The return mapping is closed-form; no sub-incrementation is needed.
pub struct Axial1D {
    /// Elastic modulus (Young's modulus or joint stiffness)
    young: f64,

    /// Initial yield stress (infinity renders the model linear elastic)
    sig_y: f64,

    /// Linear hardening modulus
    hh: f64,
}

impl Axial1D {
    /// Allocates a new elastoplastic instance
    pub fn new(young: f64, sig_y: f64, hh: f64) -> Result<Self> {
        if young <= 0.0 {
            return Err(Error::validation("young (elastic modulus) must be positive"));
        }
        if sig_y <= 0.0 {
            return Err(Error::validation("sig_y (yield stress) must be positive"));
        }
        if hh < 0.0 {
            return Err(Error::validation("hh (hardening modulus) must not be negative"));
        }
        Ok(Axial1D { young, sig_y, hh })
    }

    /// Allocates a new linear elastic instance (no yield limit)
    pub fn new_elastic(young: f64) -> Result<Self> {
        if young <= 0.0 {
            return Err(Error::validation("young (elastic modulus) must be positive"));
        }
        Ok(Axial1D {
            young,
            sig_y: f64::INFINITY,
            hh: 0.0,
        })
    }

    /// Calculates the yield function f
    pub fn yield_function(&self, state: &AxialState) -> f64 {
        if self.sig_y.is_infinite() {
            return f64::NEG_INFINITY;
        }
        state.sig.abs() - (self.sig_y + self.hh * state.eps_p)
    }

    /// Returns the tangent modulus at the current state
    pub fn tangent(&self, state: &AxialState) -> f64 {
        if state.elastic {
            self.young
        } else {
            self.young * self.hh / (self.young + self.hh)
        }
    }

    /// Integrates a strain increment into the stress state (side-effecting)
    ///
    /// Returns the stress increment.
    pub fn update_stress(&self, state: &mut AxialState, delta_strain: f64) -> Result<f64> {
        let f0 = self.yield_function(state);
        if f0 > YIELD_TOL {
            return Err(Error::state(f0, "stress state is outside the yield surface at the start of the update"));
        }
        let sig_old = state.sig;
        let sig_trial = state.sig + self.young * delta_strain;
        state.eps += delta_strain;
        let f_trial = if self.sig_y.is_infinite() {
            f64::NEG_INFINITY
        } else {
            sig_trial.abs() - (self.sig_y + self.hh * state.eps_p)
        };
        if f_trial <= 0.0 {
            state.sig = sig_trial;
            state.elastic = true;
            return Ok(state.sig - sig_old);
        }
        // closed-form radial return
        let dlambda = f_trial / (self.young + self.hh);
        state.sig = sig_trial - self.young * dlambda * sig_trial.signum();
        state.eps_p += dlambda;
        state.elastic = false;
        Ok(state.sig - sig_old)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
