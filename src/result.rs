//! Outcome of a solve attempt.
//!
//! A [`SolverResult`] is a closed tagged union: a solver either has not run
//! yet ([`SolverResult::NoSolution`]), succeeded ([`SolverResult::Result`]),
//! succeeded with advisory messages ([`SolverResult::ResultWithWarnings`]) or
//! failed ([`SolverResult::Error`]). Failures are data, not [`OptError`]s.
//!
//! [`OptError`]: crate::error::OptError

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{OptError, Result};

/// Solution payload produced by a successful solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimResult {
    /// Optimal argument `x*`
    pub x: Array1<f64>,

    /// Objective value at `x*`
    pub value: Array1<f64>,

    /// Constraint values at `x*`, all constraint outputs concatenated in
    /// insertion order
    pub constraints: Array1<f64>,

    /// Lagrange multipliers, empty if the bridge does not report them
    pub lambda: Array1<f64>,
}

impl OptimResult {
    pub fn new(x: Array1<f64>, value: Array1<f64>) -> Self {
        Self {
            x,
            value,
            constraints: Array1::zeros(0),
            lambda: Array1::zeros(0),
        }
    }

    /// Set the constraint values at the solution.
    pub fn with_constraints(mut self, constraints: Array1<f64>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the Lagrange multipliers at the solution.
    pub fn with_lambda(mut self, lambda: Array1<f64>) -> Self {
        self.lambda = lambda;
        self
    }
}

impl fmt::Display for OptimResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Result:")?;
        writeln!(
            f,
            "  Size (input, output): {}, {}",
            self.x.len(),
            self.value.len()
        )?;
        writeln!(f, "  X: {}", self.x)?;
        writeln!(f, "  Value: {}", self.value)?;
        writeln!(f, "  Constraints values: {}", self.constraints)?;
        write!(f, "  Lambda: {}", self.lambda)
    }
}

/// A usable solution accompanied by non-fatal advisory messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultWithWarnings {
    result: OptimResult,
    warnings: Vec<String>,
}

impl ResultWithWarnings {
    /// Attach `warnings` to `result`.
    ///
    /// Fails with [`OptError::InvalidResult`] if `warnings` is empty; a
    /// warning-free success is a plain [`SolverResult::Result`].
    pub fn new(result: OptimResult, warnings: Vec<String>) -> Result<Self> {
        if warnings.is_empty() {
            return Err(OptError::InvalidResult(
                "a result with warnings needs at least one warning".to_string(),
            ));
        }
        Ok(Self { result, warnings })
    }

    pub fn result(&self) -> &OptimResult {
        &self.result
    }

    /// Warnings in the order the bridge reported them.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Display for ResultWithWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        write!(f, "\n  Warnings:")?;
        for warning in &self.warnings {
            write!(f, "\n    - {}", warning)?;
        }
        Ok(())
    }
}

/// A failed solve, with an explanation and optionally the last iterate the
/// bridge reached.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct SolverError {
    message: String,
    last_state: Option<OptimResult>,
}

impl SolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            last_state: None,
        }
    }

    /// Record the last iterate reached before failing.
    pub fn with_last_state(mut self, last_state: OptimResult) -> Self {
        self.last_state = Some(last_state);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn last_state(&self) -> Option<&OptimResult> {
        self.last_state.as_ref()
    }
}

/// Discriminant of a [`SolverResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultTag {
    NoSolution,
    Result,
    ResultWithWarnings,
    SolverError,
}

impl fmt::Display for ResultTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultTag::NoSolution => "no solution",
            ResultTag::Result => "result",
            ResultTag::ResultWithWarnings => "result with warnings",
            ResultTag::SolverError => "solver error",
        };
        f.write_str(name)
    }
}

/// Outcome of a solve attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolverResult {
    /// No solve has completed since construction or the last reset.
    #[default]
    NoSolution,

    /// The solve succeeded.
    Result(OptimResult),

    /// The solve succeeded with advisory messages.
    ResultWithWarnings(ResultWithWarnings),

    /// The solve failed.
    Error(SolverError),
}

impl SolverResult {
    pub fn tag(&self) -> ResultTag {
        match self {
            SolverResult::NoSolution => ResultTag::NoSolution,
            SolverResult::Result(_) => ResultTag::Result,
            SolverResult::ResultWithWarnings(_) => ResultTag::ResultWithWarnings,
            SolverResult::Error(_) => ResultTag::SolverError,
        }
    }

    /// `true` for both plain results and results with warnings.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SolverResult::Result(_) | SolverResult::ResultWithWarnings(_)
        )
    }

    pub fn is_no_solution(&self) -> bool {
        matches!(self, SolverResult::NoSolution)
    }

    /// The solution payload of a successful outcome.
    pub fn solution(&self) -> Option<&OptimResult> {
        match self {
            SolverResult::Result(result) => Some(result),
            SolverResult::ResultWithWarnings(result) => Some(result.result()),
            _ => None,
        }
    }

    /// Advisory messages; empty unless the outcome is a result with warnings.
    pub fn warnings(&self) -> &[String] {
        match self {
            SolverResult::ResultWithWarnings(result) => result.warnings(),
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&SolverError> {
        match self {
            SolverResult::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl From<OptimResult> for SolverResult {
    fn from(result: OptimResult) -> Self {
        SolverResult::Result(result)
    }
}

impl From<ResultWithWarnings> for SolverResult {
    fn from(result: ResultWithWarnings) -> Self {
        SolverResult::ResultWithWarnings(result)
    }
}

impl From<SolverError> for SolverResult {
    fn from(error: SolverError) -> Self {
        SolverResult::Error(error)
    }
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverResult::NoSolution => write!(f, "No solution."),
            SolverResult::Result(result) => write!(f, "{}", result),
            SolverResult::ResultWithWarnings(result) => write!(f, "{}", result),
            SolverResult::Error(error) => {
                write!(f, "Solver error: {}", error.message)?;
                if let Some(last) = &error.last_state {
                    write!(f, "\nLast state:\n{}", last)?;
                }
                Ok(())
            }
        }
    }
}
