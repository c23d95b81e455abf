//! # Parameter Store
//!
//! Named, described, type-tagged values exchanged between solvers, bridges
//! and reporting code. Used for solver tuning knobs
//! ([`Solver::parameters`](crate::solver::Solver::parameters)) and for
//! per-iteration diagnostics ([`SolverState::parameters`](crate::state::SolverState::parameters)).
//!
//! ## Example Usage
//!
//! ```rust
//! use optcore_rs::parameters::{ParameterStore, ParameterValue};
//! use optcore_rs::OptError;
//!
//! let mut store = ParameterStore::new();
//! store.set("tolerance", "convergence tolerance", 1e-8);
//! store.set("linear-solver", "linear solver used by the back-end", "mumps");
//!
//! *store.get_mut::<f64>("tolerance").unwrap() = 1e-6;
//! assert_eq!(*store.get::<f64>("tolerance").unwrap(), 1e-6);
//!
//! assert!(matches!(store.get::<i64>("tolerance"), Err(OptError::TypeMismatch { .. })));
//! assert_eq!(
//!     store.entry("linear-solver").unwrap().value,
//!     ParameterValue::Text("mumps".to_string())
//! );
//! ```

pub mod store;
pub mod value;

// Re-export key types
pub use store::{Parameter, ParameterStore};
pub use value::{ParameterType, ParameterValue};
