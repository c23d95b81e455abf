//! Utility functions and helpers for the optcore-rs library.

pub mod finite_difference;

// Re-export commonly used utilities
pub use finite_difference::{check_gradient, FiniteDifferenceGradient, GradientCheck};
