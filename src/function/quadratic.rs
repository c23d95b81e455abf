//! Quadratic functions

use std::fmt;

use ndarray::{array, Array1, Array2};

use super::{DerivableFunction, Function, TwiceDerivableFunction};
use crate::error::{OptError, Result};

/// Relative tolerance used when checking the symmetry of `A`.
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// A twice derivable function whose hessian does not depend on `x`.
///
/// The hessian is still requested per call through
/// [`TwiceDerivableFunction::compute_hessian`].
pub trait QuadraticFunction: TwiceDerivableFunction {}

/// The scalar function `f(x) = ½·xᵀAx + bᵀx` with `A` symmetric.
#[derive(Debug, Clone)]
pub struct NumericQuadraticFunction {
    a: Array2<f64>,
    b: Array1<f64>,
    name: String,
}

impl NumericQuadraticFunction {
    /// Create `x ↦ ½·xᵀAx + bᵀx`.
    ///
    /// Fails with [`OptError::InvalidFunction`] if `A` is not square, not
    /// symmetric, or if `b` does not match its size.
    pub fn new(a: Array2<f64>, b: Array1<f64>) -> Result<Self> {
        if a.nrows() != a.ncols() {
            return Err(OptError::InvalidFunction(format!(
                "quadratic term must be square, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if b.len() != a.nrows() {
            return Err(OptError::InvalidFunction(format!(
                "linear term has {} entries, expected {}",
                b.len(),
                a.nrows()
            )));
        }

        let n = a.nrows();
        for i in 0..n {
            for j in 0..i {
                let scale = a[[i, j]].abs().max(a[[j, i]].abs()).max(1.0);
                if (a[[i, j]] - a[[j, i]]).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(OptError::InvalidFunction(format!(
                        "quadratic term is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }

        Ok(Self {
            a,
            b,
            name: String::new(),
        })
    }

    /// Set the display label.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }
}

impl Function for NumericQuadraticFunction {
    fn input_size(&self) -> usize {
        self.a.ncols()
    }

    fn output_size(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
        array![0.5 * x.dot(&self.a.dot(x)) + self.b.dot(x)]
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Numeric quadratic function")?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        write!(f, " (R^{} -> R^1)", self.input_size())?;
        write!(f, "\n  A = {}", self.a)?;
        write!(f, "\n  b = {}", self.b)
    }
}

impl DerivableFunction for NumericQuadraticFunction {
    fn compute_gradient(&self, x: &Array1<f64>, _i: usize) -> Array1<f64> {
        self.a.dot(x) + &self.b
    }
}

impl TwiceDerivableFunction for NumericQuadraticFunction {
    fn compute_hessian(&self, _x: &Array1<f64>, _i: usize) -> Array2<f64> {
        self.a.clone()
    }
}

impl QuadraticFunction for NumericQuadraticFunction {}
