//! Linear functions
//!
//! A [`LinearFunction`] only supplies values and gradients. Its hessian is
//! provided once, here, and is the zero matrix for every output and every
//! argument. A linear function cannot implement [`TwiceDerivableFunction`]
//! itself: doing so conflicts with the blanket implementation below and is
//! rejected at compile time.

use std::fmt;

use ndarray::{Array1, Array2};

use super::{DerivableFunction, Function, QuadraticFunction, TwiceDerivableFunction};
use crate::error::{OptError, Result};

/// Marker for affine functions `x ↦ A·x + b`.
///
/// Every linear function is a [`QuadraticFunction`] and a
/// [`TwiceDerivableFunction`] through blanket implementations.
pub trait LinearFunction: DerivableFunction {}

impl<T: LinearFunction + ?Sized> TwiceDerivableFunction for T {
    fn compute_hessian(&self, _x: &Array1<f64>, _i: usize) -> Array2<f64> {
        let n = self.input_size();
        Array2::zeros((n, n))
    }
}

impl<T: LinearFunction + ?Sized> QuadraticFunction for T {}

/// The affine function `f(x) = A·x + b` with `A` of size `m × n`.
#[derive(Debug, Clone)]
pub struct NumericLinearFunction {
    a: Array2<f64>,
    b: Array1<f64>,
    name: String,
}

impl NumericLinearFunction {
    /// Create `x ↦ A·x + b`.
    ///
    /// Fails with [`OptError::InvalidFunction`] if `b.len()` differs from the
    /// number of rows of `A`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use optcore_rs::function::{FunctionExt, NumericLinearFunction, TwiceDerivableFunctionExt};
    ///
    /// let f = NumericLinearFunction::new(array![[1.0, 2.0]], array![3.0]).unwrap();
    /// assert_eq!(f.evaluate(&array![1.0, 1.0]).unwrap(), array![6.0]);
    /// assert_eq!(f.hessian(&array![1.0, 1.0], 0).unwrap(), ndarray::Array2::<f64>::zeros((2, 2)));
    /// ```
    pub fn new(a: Array2<f64>, b: Array1<f64>) -> Result<Self> {
        if a.nrows() != b.len() {
            return Err(OptError::InvalidFunction(format!(
                "linear term has {} rows but constant term has {} entries",
                a.nrows(),
                b.len()
            )));
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

    /// The matrix `A`.
    pub fn a(&self) -> &Array2<f64> {
        &self.a
    }

    /// The vector `b`.
    pub fn b(&self) -> &Array1<f64> {
        &self.b
    }
}

impl Function for NumericLinearFunction {
    fn input_size(&self) -> usize {
        self.a.ncols()
    }

    fn output_size(&self) -> usize {
        self.a.nrows()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
        self.a.dot(x) + &self.b
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Numeric linear function")?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        write!(f, " (R^{} -> R^{})", self.input_size(), self.output_size())?;
        write!(f, "\n  A = {}", self.a)?;
        write!(f, "\n  b = {}", self.b)
    }
}

impl DerivableFunction for NumericLinearFunction {
    fn compute_gradient(&self, _x: &Array1<f64>, i: usize) -> Array1<f64> {
        self.a.row(i).to_owned()
    }

    fn compute_jacobian(&self, _x: &Array1<f64>) -> Array2<f64> {
        self.a.clone()
    }
}

impl LinearFunction for NumericLinearFunction {}
