use crate::mesh::CellId;
use thiserror::Error;

/// Defines the error type with structured diagnostic payloads
///
/// All errors abort the current stage immediately, except that the capacity
/// search treats a stage-level [`Error::Convergence`] as recoverable and
/// rolls back to the last checkpoint.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Invalid parameters, incompatible model/geometry pairing, or an
    /// ill-posed stage (e.g., no prescribed DOFs)
    #[error("validation error: {message}")]
    Validation {
        /// Description of the offending input
        message: &'static str,
    },

    /// A material point entered stress integration already outside its
    /// yield tolerance (inconsistent restart or sequencing bug)
    #[error("state error: {message} (element = {element:?}, f = {yield_value:e})")]
    State {
        /// Element owning the failing integration point (None for
        /// stand-alone material point drivers)
        element: Option<CellId>,

        /// Value of the yield function at the offending state
        yield_value: f64,

        /// Description of the inconsistency
        message: &'static str,
    },

    /// Newton iteration or root search exceeded its budget, lost its
    /// bracket, or produced a non-finite residual
    #[error("convergence error: {message} (element = {element:?}, iteration = {iteration}, residual = {residual:e})")]
    Convergence {
        /// Element being processed when the failure occurred (None for
        /// global solver failures)
        element: Option<CellId>,

        /// Iteration index at failure
        iteration: usize,

        /// Residual (or root-search function value) at failure
        residual: f64,

        /// Description of the failure
        message: &'static str,
    },
}

impl Error {
    /// Creates a new Validation error
    pub fn validation(message: &'static str) -> Self {
        Error::Validation { message }
    }

    /// Creates a new State error without element information
    pub fn state(yield_value: f64, message: &'static str) -> Self {
        Error::State {
            element: None,
            yield_value,
            message,
        }
    }

    /// Creates a new Convergence error without element information
    pub fn convergence(iteration: usize, residual: f64, message: &'static str) -> Self {
        Error::Convergence {
            element: None,
            iteration,
            residual,
            message,
        }
    }

    /// Attaches the id of the element being processed
    pub fn with_element(self, cell_id: CellId) -> Self {
        match self {
            Error::Validation { .. } => self,
            Error::State {
                yield_value, message, ..
            } => Error::State {
                element: Some(cell_id),
                yield_value,
                message,
            },
            Error::Convergence {
                iteration,
                residual,
                message,
                ..
            } => Error::Convergence {
                element: Some(cell_id),
                iteration,
                residual,
                message,
            },
        }
    }
}

/// Defines an alias for Result with the crate error type
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_works() {
        let e = Error::validation("phi must be positive");
        assert_eq!(format!("{}", e), "validation error: phi must be positive");

        let e = Error::state(0.5, "stress is outside the yield surface").with_element(3);
        assert!(format!("{}", e).contains("element = Some(3)"));

        let e = Error::convergence(10, 1e3, "maximum number of iterations reached");
        assert!(format!("{}", e).contains("iteration = 10"));
    }

    #[test]
    fn with_element_works() {
        let e = Error::convergence(2, 0.1, "diverging").with_element(7);
        match e {
            Error::Convergence {
                element,
                iteration,
                residual,
                ..
            } => {
                assert_eq!(element, Some(7));
                assert_eq!(iteration, 2);
                assert_eq!(residual, 0.1);
            }
            _ => panic!("wrong variant"),
        }
        let e = Error::validation("nope").with_element(7);
        assert!(matches!(e, Error::Validation { .. }));
    }
}
