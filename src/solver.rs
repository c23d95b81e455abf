//! # Solver lifecycle
//!
//! A [`Solver`] owns a [`Problem`], a bridge to a numerical back-end and the
//! cached [`SolverResult`] of the last solve. The problem cannot be modified
//! once the solver is built.
//!
//! [`GenericSolver::minimum`] runs the bridge only when no outcome is cached,
//! so repeated calls are free; [`GenericSolver::reset`] discards the cached
//! outcome and the next call to `minimum` solves again.
//!
//! A [`Bridge`] implements one solve step. It receives a [`SolveContext`]
//! giving access to the problem, the solver parameters and a fresh
//! [`SolverState`], and must return a result, a result with warnings or an
//! error. Returning [`SolverResult::NoSolution`] is a contract violation and
//! is reported as [`OptError::NoSolution`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ndarray::{array, Array2};
//! use optcore_rs::function::{DerivableFunction, FunctionExt, NumericQuadraticFunction};
//! use optcore_rs::{Bridge, GenericSolver, OptimResult, Problem, SolveContext, Solver, SolverResult};
//!
//! /// Reports the starting point as the solution.
//! struct StartingPoint;
//!
//! impl Bridge<dyn DerivableFunction> for StartingPoint {
//!     fn name(&self) -> &str {
//!         "starting-point"
//!     }
//!
//!     fn solve(&mut self, ctx: &mut SolveContext<'_, dyn DerivableFunction>) -> SolverResult {
//!         let x = ctx.problem().starting_point().cloned().unwrap_or_else(|| ctx.state().x().clone());
//!         match ctx.problem().function().evaluate(&x) {
//!             Ok(value) => OptimResult::new(x, value).into(),
//!             Err(e) => optcore_rs::SolverError::new(e.to_string()).into(),
//!         }
//!     }
//! }
//!
//! let cost = NumericQuadraticFunction::new(Array2::eye(2), array![0.0, 0.0])?;
//! let mut problem = Problem::<dyn DerivableFunction>::new(Arc::new(cost))?;
//! problem.set_starting_point(array![1.0, 2.0])?;
//!
//! let mut solver = Solver::new(problem, StartingPoint);
//! let result = solver.minimum()?;
//! assert_eq!(result.solution().unwrap().value, array![2.5]);
//! # Ok::<(), optcore_rs::OptError>(())
//! ```

use std::fmt;

use log::{debug, trace, warn};

use crate::error::{OptError, Result};
use crate::function::{Broaden, Function};
use crate::parameters::{ParameterStore, ParameterType, ParameterValue};
use crate::problem::Problem;
use crate::result::SolverResult;
use crate::state::SolverState;

/// Callback invoked by [`SolveContext::notify`] after each iteration.
pub type IterationCallback<F, C> = Box<dyn FnMut(&Problem<F, C>, &SolverState)>;

/// A numerical back-end able to solve problems over `F` and `C`.
pub trait Bridge<F: ?Sized, C: ?Sized = F> {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Run one solve attempt.
    ///
    /// Back-end failures such as divergence or infeasibility are returned as
    /// [`SolverResult::Error`].
    fn solve(&mut self, ctx: &mut SolveContext<'_, F, C>) -> SolverResult;
}

/// What a bridge sees during one solve attempt.
pub struct SolveContext<'a, F: ?Sized, C: ?Sized = F> {
    problem: &'a Problem<F, C>,
    parameters: &'a ParameterStore,
    state: SolverState,
    callback: Option<&'a mut IterationCallback<F, C>>,
    iterations: usize,
}

impl<'a, F: Function + ?Sized, C: Function + ?Sized> SolveContext<'a, F, C> {
    pub fn problem(&self) -> &'a Problem<F, C> {
        self.problem
    }

    /// Solver parameters set by the user.
    pub fn parameters(&self) -> &'a ParameterStore {
        self.parameters
    }

    /// Typed lookup in the solver parameters.
    pub fn parameter<T: ParameterType>(&self, key: &str) -> Result<&'a T> {
        self.parameters.get(key)
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SolverState {
        &mut self.state
    }

    /// Number of calls to [`notify`](SolveContext::notify) so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Report the end of an iteration.
    ///
    /// Runs the iteration callback, if any, on the current state.
    pub fn notify(&mut self) {
        self.iterations += 1;
        trace!(
            "Iteration {}: cost {:?}, constraint violation {:?}",
            self.iterations,
            self.state.cost(),
            self.state.constraint_violation()
        );

        if let Some(callback) = &mut self.callback {
            (**callback)(self.problem, &self.state);
        }
    }
}

/// Memoizing solve lifecycle.
pub trait GenericSolver {
    /// Run the back-end unconditionally and cache its outcome.
    fn solve(&mut self) -> Result<()>;

    /// The cached outcome, [`SolverResult::NoSolution`] before any solve.
    fn result(&self) -> &SolverResult;

    /// Discard the cached outcome.
    fn reset(&mut self);

    /// The cached outcome, solving first if there is none.
    ///
    /// Never returns [`SolverResult::NoSolution`].
    fn minimum(&mut self) -> Result<&SolverResult> {
        if self.result().is_no_solution() {
            self.solve()?;
        } else {
            trace!("Returning cached {}", self.result().tag());
        }
        Ok(self.result())
    }
}

/// A problem bound to a bridge, with its cached outcome.
pub struct Solver<F: ?Sized, C: ?Sized, B> {
    problem: Problem<F, C>,
    bridge: B,
    parameters: ParameterStore,
    result: SolverResult,
    callback: Option<IterationCallback<F, C>>,
}

impl<F, C, B> Solver<F, C, B>
where
    F: Function + ?Sized,
    C: Function + ?Sized,
    B: Bridge<F, C>,
{
    pub fn new(problem: Problem<F, C>, bridge: B) -> Self {
        Self {
            problem,
            bridge,
            parameters: ParameterStore::new(),
            result: SolverResult::NoSolution,
            callback: None,
        }
    }

    /// Build a solver over a broadened copy of `problem`.
    pub fn from_problem<G, D>(problem: &Problem<G, D>, bridge: B) -> Self
    where
        G: Function + Broaden<F> + ?Sized,
        D: Function + Broaden<C> + ?Sized,
    {
        Self::new(problem.broaden(), bridge)
    }

    pub fn problem(&self) -> &Problem<F, C> {
        &self.problem
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    /// Mutable solver parameters.
    ///
    /// Changing a parameter does not discard a cached outcome; call
    /// [`reset`](GenericSolver::reset) to solve again.
    pub fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    pub fn set_parameter(&mut self, key: &str, description: &str, value: impl Into<ParameterValue>) {
        self.parameters.set(key, description, value);
    }

    /// Install the per-iteration callback, replacing any previous one.
    pub fn set_iteration_callback<Cb>(&mut self, callback: Cb)
    where
        Cb: FnMut(&Problem<F, C>, &SolverState) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_iteration_callback(&mut self) {
        self.callback = None;
    }
}

impl<F, C, B> GenericSolver for Solver<F, C, B>
where
    F: Function + ?Sized,
    C: Function + ?Sized,
    B: Bridge<F, C>,
{
    fn solve(&mut self) -> Result<()> {
        debug!(
            "Solving with '{}': {} arguments, {} constraints",
            self.bridge.name(),
            self.problem.input_size(),
            self.problem.constraint_count()
        );

        let mut ctx = SolveContext {
            problem: &self.problem,
            parameters: &self.parameters,
            state: SolverState::new(&self.problem),
            callback: self.callback.as_mut(),
            iterations: 0,
        };
        let outcome = self.bridge.solve(&mut ctx);
        let iterations = ctx.iterations;

        if outcome.is_no_solution() {
            warn!("Solver '{}' returned without a result", self.bridge.name());
            self.result = SolverResult::NoSolution;
            return Err(OptError::NoSolution {
                bridge: self.bridge.name().to_string(),
            });
        }

        for warning in outcome.warnings() {
            warn!("Solver '{}': {}", self.bridge.name(), warning);
        }
        debug!(
            "Solver '{}' finished after {} iterations: {}",
            self.bridge.name(),
            iterations,
            outcome.tag()
        );

        self.result = outcome;
        Ok(())
    }

    fn result(&self) -> &SolverResult {
        &self.result
    }

    fn reset(&mut self) {
        self.result = SolverResult::NoSolution;
    }
}

impl<F, C, B> fmt::Display for Solver<F, C, B>
where
    F: Function + ?Sized,
    C: Function + ?Sized,
    B: Bridge<F, C>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solver '{}':", self.bridge.name())?;
        writeln!(f, "{}", self.problem)?;
        if !self.parameters.is_empty() {
            writeln!(f, "{}", self.parameters)?;
        }
        write!(f, "{}", self.result)
    }
}
