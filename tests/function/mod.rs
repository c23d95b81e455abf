//! Tests for the function hierarchy.

mod numeric_function_tests;
