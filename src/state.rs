//! Per-solve working record.
//!
//! A [`SolverState`] is created by the solver at the start of every solve
//! attempt and handed to the bridge through its
//! [`SolveContext`](crate::solver::SolveContext). The bridge updates the
//! iterate and the optional cost and constraint violation, and may publish
//! named diagnostics in the parameter store.

use std::fmt;

use ndarray::Array1;

use crate::error::Result;
use crate::function::Function;
use crate::parameters::{ParameterStore, ParameterType, ParameterValue};
use crate::problem::Problem;

/// Current iterate, cost, constraint violation and diagnostics of one solve.
#[derive(Debug)]
pub struct SolverState {
    x: Array1<f64>,
    cost: Option<f64>,
    constraint_violation: Option<f64>,
    parameters: ParameterStore,
}

impl SolverState {
    /// State for `problem`, with a zero iterate of length `n` and no cost or
    /// constraint violation.
    pub fn new<F, C>(problem: &Problem<F, C>) -> Self
    where
        F: Function + ?Sized,
        C: Function + ?Sized,
    {
        Self {
            x: Array1::zeros(problem.input_size()),
            cost: None,
            constraint_violation: None,
            parameters: ParameterStore::new(),
        }
    }

    /// Current iterate.
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn x_mut(&mut self) -> &mut Array1<f64> {
        &mut self.x
    }

    /// Cost at the current iterate, if the bridge computed it.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn cost_mut(&mut self) -> &mut Option<f64> {
        &mut self.cost
    }

    pub fn constraint_violation(&self) -> Option<f64> {
        self.constraint_violation
    }

    pub fn constraint_violation_mut(&mut self) -> &mut Option<f64> {
        &mut self.constraint_violation
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    /// Typed lookup in the diagnostics store.
    ///
    /// Fails with [`OptError::KeyNotFound`](crate::OptError::KeyNotFound) or
    /// [`OptError::TypeMismatch`](crate::OptError::TypeMismatch).
    pub fn get_parameter<T: ParameterType>(&self, key: &str) -> Result<&T> {
        self.parameters.get(key)
    }

    pub fn get_parameter_mut<T: ParameterType>(&mut self, key: &str) -> Result<&mut T> {
        self.parameters.get_mut(key)
    }

    /// Insert or replace a diagnostic value.
    pub fn set_parameter(&mut self, key: &str, description: &str, value: impl Into<ParameterValue>) {
        self.parameters.set(key, description, value);
    }
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solver state:")?;
        write!(f, "  x: {}", self.x)?;
        if let Some(cost) = self.cost {
            write!(f, "\n  Cost: {}", cost)?;
        }
        if let Some(violation) = self.constraint_violation {
            write!(f, "\n  Constraint violation: {}", violation)?;
        }
        if !self.parameters.is_empty() {
            write!(f, "\n  {}", self.parameters.to_string().replace('\n', "\n  "))?;
        }
        Ok(())
    }
}
