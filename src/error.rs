use thiserror::Error;

/// Error types for the optcore-rs library.
///
/// These are structural errors: malformed problems, dimension mismatches and
/// misuse of the parameter store. The outcome of a solve attempt is never
/// reported through this type; see [`crate::result::SolverResult`].
#[derive(Error, Debug)]
pub enum OptError {
    /// An argument vector, output index or argument index does not fit the
    /// dimensions of the function or problem it was used with.
    #[error("{what} out of range: got {got}, expected {expected}")]
    OutOfRange {
        what: &'static str,
        got: usize,
        expected: String,
    },

    /// The problem violates one of its structural invariants.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// A bound interval whose lower limit exceeds its upper limit.
    #[error("Invalid bound: lower ({lower}) must not exceed upper ({upper})")]
    InvalidBound { lower: f64, upper: f64 },

    /// A numeric function was given inconsistent data.
    #[error("Invalid function: {0}")]
    InvalidFunction(String),

    /// Parameter lookup with an unknown key.
    #[error("Parameter not found: {0}")]
    KeyNotFound(String),

    /// Parameter lookup with the wrong value type.
    #[error("Parameter '{key}' has type {found}, requested {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A bridge returned from `solve` without producing an outcome.
    #[error("Solver '{bridge}' did not produce a result")]
    NoSolution { bridge: String },

    /// A result payload that cannot be constructed.
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OptError {
    /// Dimension check shared by functions and problems.
    pub(crate) fn check_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
        if got != expected {
            return Err(OptError::OutOfRange {
                what,
                got,
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    /// Index check: `index` must be strictly below `len`.
    pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(OptError::OutOfRange {
                what,
                got: index,
                expected: format!("< {}", len),
            });
        }
        Ok(())
    }
}

/// Result type alias for optcore-rs operations.
pub type Result<T> = std::result::Result<T, OptError>;
