use super::{Elements, FemState, Solver, Stage};
use crate::base::{Error, Result};

/// Holds the options of the capacity/limit-load search
#[derive(Clone, Copy, Debug)]
pub struct CapacityOptions {
    /// Initial load-factor step
    pub step_initial: f64,

    /// Step size ending the search (success)
    pub step_tol: f64,

    /// Maximum number of outer iterations
    pub nmax_outer: usize,
}

impl CapacityOptions {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        CapacityOptions {
            step_initial: 1.0,
            step_tol: 1e-3,
            nmax_outer: 40,
        }
    }

    /// Validates the options
    pub fn validate(&self) -> Result<()> {
        if self.step_initial <= 0.0 {
            return Err(Error::validation("step_initial must be positive"));
        }
        if self.step_tol <= 0.0 || self.step_tol >= self.step_initial {
            return Err(Error::validation("step_tol must be positive and smaller than step_initial"));
        }
        if self.nmax_outer < 1 {
            return Err(Error::validation("nmax_outer must be at least 1"));
        }
        Ok(())
    }
}

/// Holds the outcome of the capacity search
#[derive(Clone, Copy, Debug)]
pub struct CapacityResult {
    /// Largest load factor with a converged stage
    pub load_factor: f64,

    /// Number of outer iterations
    pub n_outer: usize,

    /// Number of rejected (rolled back) trial factors
    pub n_rejected: usize,
}

/// Searches the limit load factor by scaled stage solves with rollback
///
/// The outer loop scales the stage's natural loads by a factor `lf`. Each
/// successful trial commits the state and checkpoints it; each failed trial
/// (stage-level Convergence error, the only recoverable failure) restores
/// the checkpoint and halves the step. The search ends when the step falls
/// below `step_tol`, or fails after `nmax_outer` outer iterations.
pub fn solve_to_limit(
    solver: &Solver,
    elements: &mut Elements,
    state: &mut FemState,
    stage: &Stage,
    options: &CapacityOptions,
) -> Result<CapacityResult> {
    options.validate()?;
    let mut checkpoint = state.clone(); // save_state
    let mut lf = 0.0;
    let mut step = options.step_initial;
    let mut n_rejected = 0;
    for outer in 0..options.nmax_outer {
        if step < options.step_tol {
            return Ok(CapacityResult {
                load_factor: lf,
                n_outer: outer,
                n_rejected,
            });
        }
        let trial = lf + step;
        // the loads are cumulative: apply only the delta from the committed factor
        let scaled = stage.scaled_natural(trial - lf);
        match solver.run_stage(elements, state, &scaled) {
            Ok(summary) => {
                if summary.increments.iter().all(|inc| inc.converged) {
                    log::debug!("capacity search: lf = {} accepted", trial);
                    lf = trial;
                    checkpoint = state.clone(); // save_state
                } else {
                    // FE-style stages never report convergence; reject
                    *state = checkpoint.clone(); // restore_state
                    step *= 0.5;
                    n_rejected += 1;
                }
            }
            Err(Error::Convergence { residual, .. }) => {
                log::debug!("capacity search: lf = {} rejected (residual = {})", trial, residual);
                *state = checkpoint.clone(); // restore_state
                step *= 0.5;
                n_rejected += 1;
            }
            Err(other) => return Err(other),
        }
    }
    Err(Error::convergence(
        options.nmax_outer,
        step,
        "capacity search did not converge within the outer iteration budget",
    ))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::CapacityOptions;
    use crate::base::Error;

    #[test]
    fn options_validation_works() {
        let mut options = CapacityOptions::new();
        assert_eq!(options.validate(), Ok(()));
        options.step_tol = 2.0;
        assert_eq!(
            options.validate().err(),
            Some(Error::validation("step_tol must be positive and smaller than step_initial"))
        );
        let mut options = CapacityOptions::new();
        options.step_initial = 0.0;
        assert_eq!(
            options.validate().err(),
            Some(Error::validation("step_initial must be positive"))
        );
    }
}
