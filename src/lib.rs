//! # optcore-rs
//!
//! `optcore-rs` describes nonlinear optimization problems independently of
//! the numerical solver that processes them, and defines the lifecycle that
//! solver back-ends plug into.
//!
//! The library provides:
//! - A function hierarchy tiered by the derivative information a function
//!   promises (values, gradients, hessians, quadratic and linear forms)
//! - A problem type aggregating an objective, bounded and scaled constraints,
//!   argument bounds and scales, and an optional starting point
//! - A memoizing solver lifecycle around a user supplied bridge, with a
//!   closed result type and a per-solve state for diagnostics
//! - A named, type-tagged parameter store for solver settings and
//!   diagnostics
//! - Finite-difference utilities to check analytic gradients
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use ndarray::array;
//! use optcore_rs::function::{Function, NumericQuadraticFunction};
//! use optcore_rs::{Bridge, GenericSolver, OptimResult, Problem, SolveContext, Solver, SolverResult};
//!
//! /// Solves unconstrained `½ xᵀx + bᵀx` in closed form.
//! struct ClosedForm;
//!
//! impl Bridge<NumericQuadraticFunction> for ClosedForm {
//!     fn name(&self) -> &str {
//!         "closed-form"
//!     }
//!
//!     fn solve(&mut self, ctx: &mut SolveContext<'_, NumericQuadraticFunction>) -> SolverResult {
//!         let f = ctx.problem().function();
//!         let x = -f.b();
//!         let value = f.compute(&x);
//!         OptimResult::new(x, value).into()
//!     }
//! }
//!
//! let f = NumericQuadraticFunction::new(ndarray::Array2::eye(2), array![-1.0, 2.0])?;
//! let problem = Problem::<NumericQuadraticFunction>::new(Arc::new(f))?;
//! let mut solver = Solver::new(problem, ClosedForm);
//!
//! let result = solver.minimum()?;
//! assert_eq!(result.solution().unwrap().x, array![1.0, -2.0]);
//! # Ok::<(), optcore_rs::OptError>(())
//! ```

pub mod error;
pub mod function;
pub mod interval;
pub mod parameters;
pub mod problem;
pub mod result;
pub mod solver;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use error::{OptError, Result};
pub use interval::Interval;
pub use parameters::{Parameter, ParameterStore, ParameterValue};
pub use problem::{Constraint, MixedConstraint, Problem};
pub use result::{OptimResult, ResultTag, ResultWithWarnings, SolverError, SolverResult};
pub use solver::{Bridge, GenericSolver, IterationCallback, SolveContext, Solver};
pub use state::SolverState;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
