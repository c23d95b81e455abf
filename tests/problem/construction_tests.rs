//! Problem construction and its failure modes.

use std::sync::Arc;

use ndarray::{array, Array1, Array2};
use optcore_rs::function::{
    DerivableFunction, Function, NumericLinearFunction, NumericQuadraticFunction,
    TwiceDerivableFunction,
};
use optcore_rs::{Interval, MixedConstraint, OptError, Problem};

use crate::test_helpers::{Hs71Cost, Hs71Product, Hs71SquaredNorm};

type Hs71Problem = Problem<dyn TwiceDerivableFunction>;

#[test]
fn test_bound_count_must_match_arguments() {
    let result = Hs71Problem::with_bounds(
        Arc::new(Hs71Cost),
        vec![Interval::new(1.0, 5.0).unwrap(); 3],
        vec![1.0; 4],
    );
    match result {
        Err(OptError::InvalidProblem(message)) => assert!(message.contains("argument bounds")),
        Err(other) => panic!("Expected InvalidProblem, got {}", other),
        Ok(_) => panic!("Expected InvalidProblem"),
    }

    let result = Hs71Problem::with_bounds(
        Arc::new(Hs71Cost),
        vec![Interval::free(); 4],
        vec![1.0; 5],
    );
    assert!(matches!(result, Err(OptError::InvalidProblem(_))));
}

#[test]
fn test_reversed_interval_is_rejected() {
    match Interval::new(5.0, 1.0) {
        Err(OptError::InvalidBound { lower, upper }) => {
            assert_eq!(lower, 5.0);
            assert_eq!(upper, 1.0);
        }
        other => panic!("Expected InvalidBound, got {:?}", other),
    }
    assert!(Interval::new(f64::NAN, 1.0).is_err());
}

#[test]
fn test_constraint_dimensions_are_checked() {
    let mut problem = Hs71Problem::new(Arc::new(Hs71Cost)).unwrap();

    // Two arguments instead of four
    let small = NumericQuadraticFunction::new(Array2::eye(2), Array1::zeros(2)).unwrap();
    assert!(matches!(
        problem.add_scalar_constraint(Arc::new(small), Interval::free(), 1.0),
        Err(OptError::InvalidProblem(_))
    ));

    // One bound, one output, two scales
    assert!(matches!(
        problem.add_constraint(Arc::new(Hs71Product), vec![Interval::free()], vec![1.0, 1.0]),
        Err(OptError::InvalidProblem(_))
    ));

    // Zero scale
    assert!(problem
        .add_scalar_constraint(Arc::new(Hs71Product), Interval::free(), 0.0)
        .is_err());

    // Nothing was added by the failed calls
    assert_eq!(problem.constraint_count(), 0);
}

#[test]
fn test_constraints_keep_insertion_order() {
    let mut problem = Hs71Problem::new(Arc::new(Hs71Cost)).unwrap();
    problem
        .add_scalar_constraint(
            Arc::new(Hs71Product),
            Interval::lower_bounded(25.0).unwrap(),
            1.0,
        )
        .unwrap();
    problem
        .add_scalar_constraint(Arc::new(Hs71SquaredNorm), Interval::exact(40.0).unwrap(), 2.0)
        .unwrap();
    problem
        .add_scalar_constraint(Arc::new(Hs71Product), Interval::upper_bounded(500.0).unwrap(), 3.0)
        .unwrap();

    let names: Vec<&str> = problem
        .constraints()
        .iter()
        .map(|c| c.function().name())
        .collect();
    assert_eq!(names, vec!["hs71 product", "hs71 squared norm", "hs71 product"]);

    let scales: Vec<f64> = problem.constraints().iter().map(|c| c.scales()[0]).collect();
    assert_eq!(scales, vec![1.0, 2.0, 3.0]);
    assert!(problem.constraints()[1].bounds()[0].is_equality());
}

#[test]
fn test_argument_index_out_of_range() {
    let mut problem = Hs71Problem::new(Arc::new(Hs71Cost)).unwrap();

    assert!(matches!(
        problem.set_argument_bound(4, Interval::free()),
        Err(OptError::OutOfRange { got: 4, .. })
    ));
    assert!(matches!(
        problem.set_starting_point(array![1.0, 5.0, 5.0]),
        Err(OptError::OutOfRange { got: 3, .. })
    ));
}

#[test]
fn test_broadening_is_one_directional() {
    let mut problem = Hs71Problem::new(Arc::new(Hs71Cost)).unwrap();
    problem
        .add_scalar_constraint(Arc::new(Hs71SquaredNorm), Interval::exact(40.0).unwrap(), 1.0)
        .unwrap();
    problem.set_starting_point(array![1.0, 5.0, 5.0, 1.0]).unwrap();

    // Twice derivable objective, derivable constraints
    let derivable: Problem<dyn TwiceDerivableFunction, dyn DerivableFunction> = problem.broaden();
    assert_eq!(derivable.constraint_count(), 1);

    // Value-only everything
    let values: Problem<dyn Function> = derivable.broaden();
    assert_eq!(values.starting_point(), problem.starting_point());
    assert_eq!(
        values.constraint_violation(&array![1.0, 5.0, 5.0, 1.0]).unwrap(),
        12.0
    );
}

#[test]
fn test_linear_and_nonlinear_constraints_together() {
    let mut problem: Problem<Hs71Cost, MixedConstraint> = Problem::new(Arc::new(Hs71Cost)).unwrap();

    let sum = NumericLinearFunction::new(array![[1.0, 1.0, 1.0, 1.0]], array![0.0]).unwrap();
    problem
        .add_scalar_constraint(
            Arc::new(MixedConstraint::linear(sum)),
            Interval::upper_bounded(20.0).unwrap(),
            1.0,
        )
        .unwrap();
    problem
        .add_scalar_constraint(
            Arc::new(MixedConstraint::twice_derivable(Hs71Product)),
            Interval::lower_bounded(25.0).unwrap(),
            1.0,
        )
        .unwrap();

    let linear: Vec<bool> = problem
        .constraints()
        .iter()
        .map(|c| c.function().is_linear())
        .collect();
    assert_eq!(linear, vec![true, false]);
    assert_eq!(problem.constraint_output_size(), 2);

    let broader: Problem<dyn DerivableFunction> = problem.broaden();
    assert_eq!(
        broader.constraint_violation(&array![1.0, 1.0, 1.0, 1.0]).unwrap(),
        24.0
    );
}
