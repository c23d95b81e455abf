//! Tests for the solver lifecycle.

mod hs71_tests;
