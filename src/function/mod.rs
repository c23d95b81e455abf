//! # Function hierarchy
//!
//! Functions are `R^n → R^m` mappings, seen as `m` scalar functions
//! `R^n → R`. The trait a function implements states how much derivative
//! information a solver may request from it:
//!
//! - [`Function`]: values only
//! - [`DerivableFunction`]: values and gradients (and therefore a jacobian)
//! - [`TwiceDerivableFunction`]: values, gradients and hessians
//! - [`QuadraticFunction`]: twice derivable with a hessian constant in `x`
//! - [`LinearFunction`]: derivable, with a hessian that is always zero
//!
//! The tier is the amount of information promised to the solver, not the
//! mathematical nature of the function: a twice differentiable function may
//! implement [`DerivableFunction`] only and never be asked for a hessian.
//!
//! Implementors provide the unchecked `compute*` methods. Callers go through
//! the checked accessors of [`FunctionExt`], [`DerivableFunctionExt`] and
//! [`TwiceDerivableFunctionExt`], which validate dimensions and cannot be
//! overridden.
//!
//! ## Example
//!
//! ```rust
//! use ndarray::{array, Array1, Array2};
//! use optcore_rs::function::{
//!     DerivableFunction, DerivableFunctionExt, Function, FunctionExt, TwiceDerivableFunction,
//!     TwiceDerivableFunctionExt,
//! };
//!
//! /// f(x) = x₀² + x₁²
//! struct SquaredNorm;
//!
//! impl Function for SquaredNorm {
//!     fn input_size(&self) -> usize {
//!         2
//!     }
//!
//!     fn output_size(&self) -> usize {
//!         1
//!     }
//!
//!     fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
//!         array![x.dot(x)]
//!     }
//! }
//!
//! impl DerivableFunction for SquaredNorm {
//!     fn compute_gradient(&self, x: &Array1<f64>, _i: usize) -> Array1<f64> {
//!         x * 2.0
//!     }
//! }
//!
//! impl TwiceDerivableFunction for SquaredNorm {
//!     fn compute_hessian(&self, _x: &Array1<f64>, _i: usize) -> Array2<f64> {
//!         Array2::<f64>::eye(2) * 2.0
//!     }
//! }
//!
//! let x = array![1.0, 2.0];
//! assert_eq!(SquaredNorm.evaluate(&x).unwrap(), array![5.0]);
//! assert_eq!(SquaredNorm.gradient(&x, 0).unwrap(), array![2.0, 4.0]);
//! assert!(SquaredNorm.gradient(&x, 1).is_err());
//! assert_eq!(SquaredNorm.hessian(&x, 0).unwrap()[[1, 1]], 2.0);
//! ```

use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{OptError, Result};

pub mod broaden;
pub mod linear;
pub mod quadratic;

pub use broaden::Broaden;
pub use linear::{LinearFunction, NumericLinearFunction};
pub use quadratic::{NumericQuadraticFunction, QuadraticFunction};

/// A function `R^n → R^m` that can be evaluated.
///
/// Evaluation must not have observable side effects: a function object is
/// stateless with respect to the optimization loop.
pub trait Function {
    /// Input dimension `n`.
    fn input_size(&self) -> usize;

    /// Output dimension `m`.
    fn output_size(&self) -> usize;

    /// Display label.
    fn name(&self) -> &str {
        ""
    }

    /// Evaluate the function at `x`.
    ///
    /// `x` is guaranteed to have length [`input_size`](Function::input_size)
    /// when called through [`FunctionExt::evaluate`]; the returned vector must
    /// have length [`output_size`](Function::output_size).
    fn compute(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Textual rendering used by [`FunctionExt::display`].
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name().is_empty() {
            "Function"
        } else {
            self.name()
        };
        write!(
            f,
            "{} (R^{} -> R^{})",
            name,
            self.input_size(),
            self.output_size()
        )
    }
}

/// A function that also provides first derivatives.
pub trait DerivableFunction: Function {
    /// Gradient of the `i`-th output component at `x`, of length `n`.
    ///
    /// `i < m` and `x.len() == n` are guaranteed when called through
    /// [`DerivableFunctionExt::gradient`].
    fn compute_gradient(&self, x: &Array1<f64>, i: usize) -> Array1<f64>;

    /// Jacobian at `x`, an `m × n` matrix whose row `i` is the gradient of
    /// output `i`.
    ///
    /// The default stacks [`compute_gradient`](DerivableFunction::compute_gradient);
    /// overrides must keep rows identical to the gradients. A gradient whose
    /// length is not `n` yields an `m × len` matrix, which
    /// [`DerivableFunctionExt::jacobian`] rejects.
    fn compute_jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        let (m, n) = (self.output_size(), self.input_size());
        let mut jac = Array2::zeros((m, n));
        for (i, mut row) in jac.rows_mut().into_iter().enumerate() {
            let grad = self.compute_gradient(x, i);
            if grad.len() != n {
                return Array2::zeros((m, grad.len()));
            }
            row.assign(&grad);
        }
        jac
    }
}

/// A function that also provides second derivatives.
pub trait TwiceDerivableFunction: DerivableFunction {
    /// Hessian of the `i`-th output component at `x`, a symmetric `n × n`
    /// matrix.
    fn compute_hessian(&self, x: &Array1<f64>, i: usize) -> Array2<f64>;
}

/// Checked evaluation and printing, available on every [`Function`].
pub trait FunctionExt: Function {
    /// Evaluate at `x`, failing with [`OptError::OutOfRange`] if
    /// `x.len() != n`.
    fn evaluate(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        OptError::check_len("argument size", x.len(), self.input_size())?;
        let value = self.compute(x);
        OptError::check_len("result size", value.len(), self.output_size())?;
        Ok(value)
    }

    /// Wrap the function for use with `{}` formatting.
    fn display(&self) -> FunctionDisplay<'_, Self> {
        FunctionDisplay(self)
    }
}

impl<T: Function + ?Sized> FunctionExt for T {}

/// Checked first derivatives, available on every [`DerivableFunction`].
pub trait DerivableFunctionExt: DerivableFunction {
    /// Gradient of output `i` at `x`.
    ///
    /// Fails with [`OptError::OutOfRange`] if `x.len() != n` or `i >= m`.
    fn gradient(&self, x: &Array1<f64>, i: usize) -> Result<Array1<f64>> {
        OptError::check_len("argument size", x.len(), self.input_size())?;
        OptError::check_index("output index", i, self.output_size())?;
        let grad = self.compute_gradient(x, i);
        OptError::check_len("gradient size", grad.len(), self.input_size())?;
        Ok(grad)
    }

    /// Jacobian at `x`, failing with [`OptError::OutOfRange`] if
    /// `x.len() != n`.
    fn jacobian(&self, x: &Array1<f64>) -> Result<Array2<f64>> {
        OptError::check_len("argument size", x.len(), self.input_size())?;
        let jac = self.compute_jacobian(x);
        OptError::check_len("jacobian rows", jac.nrows(), self.output_size())?;
        OptError::check_len("jacobian columns", jac.ncols(), self.input_size())?;
        Ok(jac)
    }
}

impl<T: DerivableFunction + ?Sized> DerivableFunctionExt for T {}

/// Checked second derivatives, available on every [`TwiceDerivableFunction`].
pub trait TwiceDerivableFunctionExt: TwiceDerivableFunction {
    /// Hessian of output `i` at `x`.
    ///
    /// Fails with [`OptError::OutOfRange`] if `x.len() != n` or `i >= m`.
    fn hessian(&self, x: &Array1<f64>, i: usize) -> Result<Array2<f64>> {
        OptError::check_len("argument size", x.len(), self.input_size())?;
        OptError::check_index("output index", i, self.output_size())?;
        let hess = self.compute_hessian(x, i);
        OptError::check_len("hessian rows", hess.nrows(), self.input_size())?;
        OptError::check_len("hessian columns", hess.ncols(), self.input_size())?;
        Ok(hess)
    }
}

impl<T: TwiceDerivableFunction + ?Sized> TwiceDerivableFunctionExt for T {}

/// `Display` adapter returned by [`FunctionExt::display`].
pub struct FunctionDisplay<'a, F: ?Sized>(&'a F);

impl<F: Function + ?Sized> fmt::Display for FunctionDisplay<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe(f)
    }
}
