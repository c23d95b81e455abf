//! Finite difference methods for numerical differentiation.
//!
//! This module provides functions for computing gradients and Jacobians of
//! any [`Function`] using finite difference approximations, a wrapper that
//! turns a value-only function into a [`DerivableFunction`], and a checker
//! comparing analytic gradients against the numerical ones.

use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{OptError, Result};
use crate::function::{DerivableFunction, DerivableFunctionExt, Function, FunctionExt};

/// Default step size for forward differences.
const FORWARD_EPSILON: f64 = 1e-8;

/// Default step size for central differences.
const CENTRAL_EPSILON: f64 = 1e-6;

/// Step adapted to the magnitude of the coordinate being perturbed.
fn step(value: f64, eps: f64) -> f64 {
    if value.abs() > 1.0 {
        value.abs() * eps
    } else {
        eps
    }
}

/// Central differences of output `i` of `f`, without dimension checks.
fn central_gradient<F: Function + ?Sized>(f: &F, x: &Array1<f64>, i: usize, eps: f64) -> Array1<f64> {
    let mut grad = Array1::zeros(x.len());
    let mut perturbed = x.clone();

    for j in 0..x.len() {
        let eps_j = step(x[j], eps);

        perturbed[j] = x[j] + eps_j;
        let f_forward = f.compute(&perturbed)[i];

        perturbed[j] = x[j] - eps_j;
        let f_backward = f.compute(&perturbed)[i];

        perturbed[j] = x[j];
        grad[j] = (f_forward - f_backward) / (2.0 * eps_j);
    }

    grad
}

/// Compute the gradient of output `i` using central finite differences.
///
/// # Arguments
///
/// * `f` - The function to differentiate
/// * `x` - The point at which to evaluate the gradient
/// * `i` - The output component
/// * `epsilon` - The step size for finite differences (optional)
pub fn gradient<F: Function + ?Sized>(
    f: &F,
    x: &Array1<f64>,
    i: usize,
    epsilon: Option<f64>,
) -> Result<Array1<f64>> {
    OptError::check_len("argument size", x.len(), f.input_size())?;
    OptError::check_index("output index", i, f.output_size())?;

    Ok(central_gradient(
        f,
        x,
        i,
        epsilon.unwrap_or(CENTRAL_EPSILON),
    ))
}

/// Compute the Jacobian matrix using forward finite differences.
///
/// The Jacobian is the matrix of partial derivatives of the outputs with
/// respect to the arguments: J[i,j] = ∂f_i/∂x_j.
pub fn jacobian<F: Function + ?Sized>(
    f: &F,
    x: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(FORWARD_EPSILON);
    let value = f.evaluate(x)?;

    let mut jac = Array2::zeros((f.output_size(), f.input_size()));
    let mut perturbed = x.clone();

    for j in 0..x.len() {
        let eps_j = step(x[j], eps);
        perturbed[j] = x[j] + eps_j;

        let value_perturbed = f.evaluate(&perturbed)?;
        for i in 0..value.len() {
            jac[[i, j]] = (value_perturbed[i] - value[i]) / eps_j;
        }

        perturbed[j] = x[j];
    }

    Ok(jac)
}

/// Promote a value-only function to the derivable tier using central
/// differences.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceGradient<F> {
    inner: F,
    epsilon: f64,
}

impl<F: Function> FiniteDifferenceGradient<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            epsilon: CENTRAL_EPSILON,
        }
    }

    /// Set the finite difference step.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Function> Function for FiniteDifferenceGradient<F> {
    fn input_size(&self) -> usize {
        self.inner.input_size()
    }

    fn output_size(&self) -> usize {
        self.inner.output_size()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
        self.inner.compute(x)
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.describe(f)?;
        write!(f, " [finite differences, epsilon = {}]", self.epsilon)
    }
}

impl<F: Function> DerivableFunction for FiniteDifferenceGradient<F> {
    fn compute_gradient(&self, x: &Array1<f64>, i: usize) -> Array1<f64> {
        central_gradient(&self.inner, x, i, self.epsilon)
    }
}

/// Outcome of comparing an analytic gradient with central differences.
#[derive(Debug, Clone)]
pub struct GradientCheck {
    /// Gradient returned by the function
    pub analytic: Array1<f64>,

    /// Gradient approximated by central differences
    pub numeric: Array1<f64>,

    /// Largest scaled error `|analytic - numeric| / max(1, |analytic|)`,
    /// infinite when a component is not finite
    pub max_error: f64,

    /// Tolerance the error was compared against
    pub tolerance: f64,
}

impl GradientCheck {
    pub fn passed(&self) -> bool {
        self.max_error <= self.tolerance
    }
}

impl fmt::Display for GradientCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gradient check:")?;
        writeln!(f, "  Analytic: {}", self.analytic)?;
        writeln!(f, "  Numeric: {}", self.numeric)?;
        write!(
            f,
            "  Max error: {:.3e} (tolerance {:.3e})",
            self.max_error, self.tolerance
        )
    }
}

/// Compare the analytic gradient of output `i` at `x` against central
/// differences.
///
/// Fails with [`OptError::OutOfRange`] on dimension mismatches; a wrong
/// gradient is reported through [`GradientCheck::passed`].
pub fn check_gradient<F: DerivableFunction + ?Sized>(
    f: &F,
    i: usize,
    x: &Array1<f64>,
    tolerance: f64,
) -> Result<GradientCheck> {
    let analytic = f.gradient(x, i)?;
    let numeric = central_gradient(f, x, i, CENTRAL_EPSILON);

    let max_error = analytic
        .iter()
        .zip(numeric.iter())
        .map(|(a, n)| {
            let error = (a - n).abs() / a.abs().max(1.0);
            // NaN would vanish in the fold below
            if error.is_finite() {
                error
            } else {
                f64::INFINITY
            }
        })
        .fold(0.0, f64::max);

    Ok(GradientCheck {
        analytic,
        numeric,
        max_error,
        tolerance,
    })
}
