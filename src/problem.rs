//! # Optimization problems
//!
//! A [`Problem`] aggregates an objective function `R^n → R`, one bound
//! interval and one scale per argument, an optional starting point, and an
//! ordered list of constraints. Each constraint carries one bound interval and
//! one scale per output component.
//!
//! The objective type `F` and the constraint type `C` state how much
//! derivative information a solver may request. Constraints of different
//! shapes are held through a closed enum such as [`MixedConstraint`], and a
//! problem can be re-expressed at a less informative tier with
//! [`Problem::broaden`].
//!
//! All structural invariants are checked when the problem is built or
//! modified; a solver never discovers a malformed problem.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ndarray::array;
//! use optcore_rs::function::{DerivableFunction, NumericLinearFunction, NumericQuadraticFunction};
//! use optcore_rs::{Interval, Problem};
//!
//! let cost = NumericQuadraticFunction::new(array![[2.0, 0.0], [0.0, 2.0]], array![0.0, 0.0])?;
//! let mut problem = Problem::<dyn DerivableFunction>::new(Arc::new(cost))?;
//!
//! // x0 + x1 >= 1
//! let sum = NumericLinearFunction::new(array![[1.0, 1.0]], array![0.0])?;
//! problem.add_scalar_constraint(Arc::new(sum), Interval::lower_bounded(1.0)?, 1.0)?;
//! problem.set_argument_bound(0, Interval::new(0.0, 10.0)?)?;
//!
//! assert_eq!(problem.constraint_count(), 1);
//! assert_eq!(problem.constraint_violation(&array![0.25, 0.25])?, 0.5);
//! # Ok::<(), optcore_rs::OptError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::error::{OptError, Result};
use crate::function::{
    Broaden, DerivableFunction, Function, FunctionExt, LinearFunction, TwiceDerivableFunction,
};
use crate::interval::Interval;

/// A constraint function with per-output bounds and scales.
pub struct Constraint<C: ?Sized> {
    function: Arc<C>,
    bounds: Vec<Interval>,
    scales: Vec<f64>,
}

impl<C: ?Sized> Constraint<C> {
    pub fn function(&self) -> &Arc<C> {
        &self.function
    }

    /// One interval per output component.
    pub fn bounds(&self) -> &[Interval] {
        &self.bounds
    }

    /// One scale per output component.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

impl<C: ?Sized> Clone for Constraint<C> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            bounds: self.bounds.clone(),
            scales: self.scales.clone(),
        }
    }
}

/// Objective, argument bounds and scales, starting point and constraints.
///
/// Function objects are shared through [`Arc`]; cloning a problem shares
/// them and copies the rest.
pub struct Problem<F: ?Sized, C: ?Sized = F> {
    function: Arc<F>,
    argument_bounds: Vec<Interval>,
    argument_scales: Vec<f64>,
    starting_point: Option<Array1<f64>>,
    constraints: Vec<Constraint<C>>,
}

impl<F: ?Sized, C: ?Sized> Clone for Problem<F, C> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            argument_bounds: self.argument_bounds.clone(),
            argument_scales: self.argument_scales.clone(),
            starting_point: self.starting_point.clone(),
            constraints: self.constraints.clone(),
        }
    }
}

fn check_scales(what: &str, scales: &[f64]) -> Result<()> {
    if let Some(scale) = scales.iter().find(|s| !s.is_finite() || **s <= 0.0) {
        return Err(OptError::InvalidProblem(format!(
            "{} must be finite and positive, got {}",
            what, scale
        )));
    }
    Ok(())
}

impl<F: Function + ?Sized, C: Function + ?Sized> Problem<F, C> {
    /// Create an unconstrained problem with free argument bounds and unit
    /// scales.
    ///
    /// Fails with [`OptError::InvalidProblem`] if the objective does not have
    /// exactly one output.
    pub fn new(function: Arc<F>) -> Result<Self> {
        if function.output_size() != 1 {
            return Err(OptError::InvalidProblem(format!(
                "objective must have one output, got {}",
                function.output_size()
            )));
        }

        let n = function.input_size();
        Ok(Self {
            function,
            argument_bounds: vec![Interval::free(); n],
            argument_scales: vec![1.0; n],
            starting_point: None,
            constraints: Vec::new(),
        })
    }

    /// Create a problem with explicit argument bounds and scales.
    pub fn with_bounds(function: Arc<F>, bounds: Vec<Interval>, scales: Vec<f64>) -> Result<Self> {
        let mut problem = Self::new(function)?;
        problem.set_argument_bounds(bounds)?;
        problem.set_argument_scales(scales)?;
        Ok(problem)
    }

    /// Number of arguments `n`.
    pub fn input_size(&self) -> usize {
        self.function.input_size()
    }

    pub fn function(&self) -> &Arc<F> {
        &self.function
    }

    pub fn argument_bounds(&self) -> &[Interval] {
        &self.argument_bounds
    }

    pub fn argument_scales(&self) -> &[f64] {
        &self.argument_scales
    }

    pub fn starting_point(&self) -> Option<&Array1<f64>> {
        self.starting_point.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint<C>] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Total number of constraint outputs.
    pub fn constraint_output_size(&self) -> usize {
        self.constraints
            .iter()
            .map(|c| c.function.output_size())
            .sum()
    }

    /// Replace all argument bounds; `bounds.len()` must equal `n`.
    pub fn set_argument_bounds(&mut self, bounds: Vec<Interval>) -> Result<()> {
        if bounds.len() != self.input_size() {
            return Err(OptError::InvalidProblem(format!(
                "expected {} argument bounds, got {}",
                self.input_size(),
                bounds.len()
            )));
        }
        self.argument_bounds = bounds;
        Ok(())
    }

    /// Replace the bound of argument `index`.
    pub fn set_argument_bound(&mut self, index: usize, bound: Interval) -> Result<()> {
        OptError::check_index("argument index", index, self.input_size())?;
        self.argument_bounds[index] = bound;
        Ok(())
    }

    /// Replace all argument scales; `scales.len()` must equal `n` and every
    /// scale must be finite and positive.
    pub fn set_argument_scales(&mut self, scales: Vec<f64>) -> Result<()> {
        if scales.len() != self.input_size() {
            return Err(OptError::InvalidProblem(format!(
                "expected {} argument scales, got {}",
                self.input_size(),
                scales.len()
            )));
        }
        check_scales("argument scales", &scales)?;
        self.argument_scales = scales;
        Ok(())
    }

    /// Set the starting point, of length `n`.
    pub fn set_starting_point(&mut self, x: Array1<f64>) -> Result<()> {
        OptError::check_len("starting point size", x.len(), self.input_size())?;
        self.starting_point = Some(x);
        Ok(())
    }

    pub fn clear_starting_point(&mut self) {
        self.starting_point = None;
    }

    /// Append a constraint with one bound and one scale per output.
    ///
    /// Fails with [`OptError::InvalidProblem`] if the constraint input size
    /// differs from `n`, if the bound or scale counts differ from the
    /// constraint output size, or if a scale is not finite and positive.
    pub fn add_constraint(
        &mut self,
        function: Arc<C>,
        bounds: Vec<Interval>,
        scales: Vec<f64>,
    ) -> Result<()> {
        let index = self.constraints.len();
        if function.input_size() != self.input_size() {
            return Err(OptError::InvalidProblem(format!(
                "constraint {} takes {} arguments, the objective takes {}",
                index,
                function.input_size(),
                self.input_size()
            )));
        }

        let m = function.output_size();
        if bounds.len() != m || scales.len() != m {
            return Err(OptError::InvalidProblem(format!(
                "constraint {} has {} outputs but {} bounds and {} scales",
                index,
                m,
                bounds.len(),
                scales.len()
            )));
        }
        check_scales("constraint scales", &scales)?;

        self.constraints.push(Constraint {
            function,
            bounds,
            scales,
        });
        Ok(())
    }

    /// Append a constraint with a single output.
    pub fn add_scalar_constraint(
        &mut self,
        function: Arc<C>,
        bound: Interval,
        scale: f64,
    ) -> Result<()> {
        self.add_constraint(function, vec![bound], vec![scale])
    }

    /// Largest distance from `x` to its argument bounds or from a constraint
    /// value to its interval; zero at a feasible point, infinite when a
    /// coordinate or a constraint value is NaN.
    pub fn constraint_violation(&self, x: &Array1<f64>) -> Result<f64> {
        OptError::check_len("argument size", x.len(), self.input_size())?;

        let mut violation = x
            .iter()
            .zip(&self.argument_bounds)
            .map(|(v, bound)| bound.violation(*v))
            .fold(0.0, f64::max);

        for constraint in &self.constraints {
            let values = constraint.function.evaluate(x)?;
            for (v, bound) in values.iter().zip(&constraint.bounds) {
                violation = violation.max(bound.violation(*v));
            }
        }
        Ok(violation)
    }

    /// Copy of the problem with the objective re-expressed as a `G` and the
    /// constraints as `D`.
    ///
    /// Only conversions to the same or a less informative tier exist, so an
    /// illegal direction fails to compile.
    pub fn broaden<G, D>(&self) -> Problem<G, D>
    where
        G: ?Sized,
        D: ?Sized,
        F: Broaden<G>,
        C: Broaden<D>,
    {
        Problem {
            function: <F as Broaden<G>>::broaden(Arc::clone(&self.function)),
            argument_bounds: self.argument_bounds.clone(),
            argument_scales: self.argument_scales.clone(),
            starting_point: self.starting_point.clone(),
            constraints: self
                .constraints
                .iter()
                .map(|c| Constraint {
                    function: <C as Broaden<D>>::broaden(Arc::clone(&c.function)),
                    bounds: c.bounds.clone(),
                    scales: c.scales.clone(),
                })
                .collect(),
        }
    }
}

impl<F: Function + ?Sized, C: Function + ?Sized> fmt::Debug for Problem<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("function", &self.function.display().to_string())
            .field("argument_bounds", &self.argument_bounds)
            .field("argument_scales", &self.argument_scales)
            .field("starting_point", &self.starting_point)
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

impl<F: Function + ?Sized, C: Function + ?Sized> fmt::Display for Problem<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem:")?;
        writeln!(f, "  {}", self.function.display())?;
        write!(f, "  Argument's bounds: ")?;
        write_list(f, &self.argument_bounds)?;
        write!(f, "\n  Argument's scales: ")?;
        write_list(f, &self.argument_scales)?;

        if self.constraints.is_empty() {
            write!(f, "\n  No constraints.")?;
        } else {
            write!(f, "\n  Number of constraints: {}", self.constraints.len())?;
            for (i, constraint) in self.constraints.iter().enumerate() {
                write!(f, "\n  Constraint {}: {}", i, constraint.function.display())?;
                write!(f, "\n    Bounds: ")?;
                write_list(f, &constraint.bounds)?;
                write!(f, "\n    Scales: ")?;
                write_list(f, &constraint.scales)?;
            }
        }

        match &self.starting_point {
            Some(x) => {
                write!(f, "\n  Starting point: {}", x)?;
                match self.function.evaluate(x) {
                    Ok(value) => write!(f, "\n  Starting value: {}", value),
                    Err(e) => write!(f, "\n  Starting value: <evaluation failed: {}>", e),
                }
            }
            None => write!(f, "\n  No starting point."),
        }
    }
}

/// Closed set of constraint shapes, for problems mixing linear and nonlinear
/// constraints.
#[derive(Clone)]
pub enum MixedConstraint {
    Linear(Arc<dyn LinearFunction>),
    TwiceDerivable(Arc<dyn TwiceDerivableFunction>),
}

impl MixedConstraint {
    pub fn linear<L: LinearFunction + 'static>(function: L) -> Self {
        MixedConstraint::Linear(Arc::new(function))
    }

    pub fn twice_derivable<T: TwiceDerivableFunction + 'static>(function: T) -> Self {
        MixedConstraint::TwiceDerivable(Arc::new(function))
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, MixedConstraint::Linear(_))
    }

    fn inner(&self) -> &dyn DerivableFunction {
        match self {
            MixedConstraint::Linear(f) => f.as_ref(),
            MixedConstraint::TwiceDerivable(f) => f.as_ref(),
        }
    }
}

impl Function for MixedConstraint {
    fn input_size(&self) -> usize {
        self.inner().input_size()
    }

    fn output_size(&self) -> usize {
        self.inner().output_size()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
        self.inner().compute(x)
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner().describe(f)
    }
}

impl DerivableFunction for MixedConstraint {
    fn compute_gradient(&self, x: &Array1<f64>, i: usize) -> Array1<f64> {
        self.inner().compute_gradient(x, i)
    }

    fn compute_jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        self.inner().compute_jacobian(x)
    }
}

impl TwiceDerivableFunction for MixedConstraint {
    fn compute_hessian(&self, x: &Array1<f64>, i: usize) -> Array2<f64> {
        match self {
            MixedConstraint::Linear(f) => f.compute_hessian(x, i),
            MixedConstraint::TwiceDerivable(f) => f.compute_hessian(x, i),
        }
    }
}

impl Broaden<MixedConstraint> for MixedConstraint {
    fn broaden(self: Arc<Self>) -> Arc<MixedConstraint> {
        self
    }
}
