//! Properties of the numeric linear and quadratic functions.

use std::sync::Arc;

use approx::assert_relative_eq;
use ndarray::{Array1, Array2};
use optcore_rs::function::{
    Broaden, DerivableFunctionExt, FunctionExt, LinearFunction, NumericLinearFunction,
    NumericQuadraticFunction, QuadraticFunction, TwiceDerivableFunction,
    TwiceDerivableFunctionExt,
};
use optcore_rs::OptError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::test_helpers::sample_points;

fn random_linear(rng: &mut ChaCha8Rng, m: usize, n: usize) -> NumericLinearFunction {
    let a = Array2::from_shape_fn((m, n), |_| rng.gen_range(-10.0..10.0));
    let b = Array1::from_shape_fn(m, |_| rng.gen_range(-10.0..10.0));
    NumericLinearFunction::new(a, b).unwrap()
}

#[test]
fn test_linear_function_properties() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for (m, n) in [(1, 1), (1, 4), (3, 2), (5, 5)] {
        let f = random_linear(&mut rng, m, n);

        for x in sample_points(n, 5, -100.0, 100.0, (m * 10 + n) as u64) {
            let expected = f.a().dot(&x) + f.b();
            let value = f.evaluate(&x).unwrap();
            for i in 0..m {
                assert_relative_eq!(value[i], expected[i], max_relative = 1e-12);
            }

            assert_eq!(&f.jacobian(&x).unwrap(), f.a());
            for i in 0..m {
                assert_eq!(f.gradient(&x, i).unwrap(), f.a().row(i));
                assert_eq!(f.hessian(&x, i).unwrap(), Array2::<f64>::zeros((n, n)));
            }
        }
    }
}

#[test]
fn test_linear_hessian_through_every_tier() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let f = Arc::new(random_linear(&mut rng, 2, 3));
    let x = Array1::from_vec(vec![1.0, -2.0, 3.0]);
    let zero = Array2::<f64>::zeros((3, 3));

    let as_linear: Arc<dyn LinearFunction> = f.clone();
    let as_quadratic: Arc<dyn QuadraticFunction> = f.clone().broaden();
    let as_twice: Arc<dyn TwiceDerivableFunction> = as_linear.clone().broaden();

    for i in 0..2 {
        assert_eq!(as_quadratic.hessian(&x, i).unwrap(), zero);
        assert_eq!(as_twice.hessian(&x, i).unwrap(), zero);
        assert_eq!(as_twice.gradient(&x, i).unwrap(), f.a().row(i));
    }
}

#[test]
fn test_malformed_numeric_functions() {
    let a = Array2::<f64>::zeros((2, 3));
    assert!(matches!(
        NumericLinearFunction::new(a, Array1::zeros(3)),
        Err(OptError::InvalidFunction(_))
    ));

    // Not square
    assert!(NumericQuadraticFunction::new(Array2::zeros((2, 3)), Array1::zeros(2)).is_err());

    // Not symmetric
    let mut a = Array2::<f64>::eye(2);
    a[[0, 1]] = 1.0;
    assert!(matches!(
        NumericQuadraticFunction::new(a, Array1::zeros(2)),
        Err(OptError::InvalidFunction(_))
    ));
}

#[test]
fn test_quadratic_hessian_is_constant() {
    let a = Array2::from_shape_vec((2, 2), vec![2.0, -1.0, -1.0, 3.0]).unwrap();
    let f = NumericQuadraticFunction::new(a.clone(), Array1::from_vec(vec![1.0, 1.0])).unwrap();

    for x in sample_points(2, 5, -5.0, 5.0, 11) {
        assert_eq!(f.hessian(&x, 0).unwrap(), a);

        let expected = a.dot(&x) + 1.0;
        let grad = f.gradient(&x, 0).unwrap();
        assert_relative_eq!(grad[0], expected[0], max_relative = 1e-12);
        assert_relative_eq!(grad[1], expected[1], max_relative = 1e-12);
    }
}
