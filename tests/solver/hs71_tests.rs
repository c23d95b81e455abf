//! Hock-Schittkowski problem 71 end to end:
//!
//! minimize    x0·x3·(x0 + x1 + x2) + x2
//! subject to  x0·x1·x2·x3 >= 25
//!             x0² + x1² + x2² + x3² = 40
//!             1 <= xi <= 5
//!
//! starting from (1, 5, 5, 1).

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use approx::assert_relative_eq;
use ndarray::{array, Array1};
use optcore_rs::function::{FunctionExt, TwiceDerivableFunction};
use optcore_rs::{
    Bridge, GenericSolver, Interval, OptimResult, Problem, ResultTag, SolveContext, Solver,
    SolverError, SolverResult,
};

use crate::test_helpers::{hs71_solution, Hs71Cost, Hs71Product, Hs71SquaredNorm};

type Hs71Problem = Problem<dyn TwiceDerivableFunction>;

fn hs71() -> Hs71Problem {
    let mut problem = Hs71Problem::with_bounds(
        Arc::new(Hs71Cost),
        vec![Interval::new(1.0, 5.0).unwrap(); 4],
        vec![1.0; 4],
    )
    .unwrap();
    problem
        .add_scalar_constraint(
            Arc::new(Hs71Product),
            Interval::lower_bounded(25.0).unwrap(),
            1.0,
        )
        .unwrap();
    problem
        .add_scalar_constraint(
            Arc::new(Hs71SquaredNorm),
            Interval::exact(40.0).unwrap(),
            1.0,
        )
        .unwrap();
    problem
        .set_starting_point(array![1.0, 5.0, 5.0, 1.0])
        .unwrap();
    problem
}

/// Evaluates every constraint of `problem` at `x`, concatenated.
fn constraint_values(problem: &Hs71Problem, x: &Array1<f64>) -> optcore_rs::Result<Array1<f64>> {
    let mut values = Vec::new();
    for constraint in problem.constraints() {
        values.extend(constraint.function().evaluate(x)?.iter());
    }
    Ok(Array1::from_vec(values))
}

/// Returns the known optimum without iterating.
struct KnownOptimum {
    calls: usize,
}

impl Bridge<dyn TwiceDerivableFunction> for KnownOptimum {
    fn name(&self) -> &str {
        "known-optimum"
    }

    fn solve(&mut self, ctx: &mut SolveContext<'_, dyn TwiceDerivableFunction>) -> SolverResult {
        self.calls += 1;
        let problem = ctx.problem();
        let x = hs71_solution();

        let outcome = problem
            .function()
            .evaluate(&x)
            .and_then(|value| Ok((value, constraint_values(problem, &x)?)));
        match outcome {
            Ok((value, constraints)) => OptimResult::new(x, value)
                .with_constraints(constraints)
                .into(),
            Err(e) => SolverError::new(e.to_string()).into(),
        }
    }
}

/// Walks from the starting point to the known optimum in fixed steps,
/// publishing the state after each one.
struct Interpolating;

impl Bridge<dyn TwiceDerivableFunction> for Interpolating {
    fn name(&self) -> &str {
        "interpolating"
    }

    fn solve(&mut self, ctx: &mut SolveContext<'_, dyn TwiceDerivableFunction>) -> SolverResult {
        let steps = match ctx.parameter::<i64>("steps") {
            Ok(steps) => *steps,
            Err(e) => return SolverError::new(e.to_string()).into(),
        };
        let problem = ctx.problem();
        let start = match problem.starting_point() {
            Some(x) => x.clone(),
            None => return SolverError::new("a starting point is required").into(),
        };
        let target = hs71_solution();

        for k in 1..=steps {
            let t = k as f64 / steps as f64;
            let x = &start + &((&target - &start) * t);

            let cost = problem.function().evaluate(&x).map(|v| v[0]);
            let violation = problem.constraint_violation(&x);
            let (cost, violation) = match (cost, violation) {
                (Ok(cost), Ok(violation)) => (cost, violation),
                (Err(e), _) | (_, Err(e)) => return SolverError::new(e.to_string()).into(),
            };

            let state = ctx.state_mut();
            state.x_mut().assign(&x);
            *state.cost_mut() = Some(cost);
            *state.constraint_violation_mut() = Some(violation);
            state.set_parameter("step", "interpolation parameter", t);
            ctx.notify();
        }

        let x = ctx.state().x().clone();
        match problem.function().evaluate(&x) {
            Ok(value) => OptimResult::new(x, value)
                .with_lambda(array![-0.552_294, 0.161_469])
                .into(),
            Err(e) => SolverError::new(e.to_string()).into(),
        }
    }
}

#[test]
fn test_problem_description() {
    let problem = hs71();

    assert_eq!(problem.input_size(), 4);
    assert_eq!(problem.constraint_count(), 2);
    assert!(problem
        .argument_bounds()
        .iter()
        .all(|b| b.lower() == 1.0 && b.upper() == 5.0));

    let start = problem.starting_point().unwrap();
    assert_eq!(problem.function().evaluate(start).unwrap(), array![16.0]);

    // g0(start) = 25 is feasible, g1(start) = 52 misses 40 by 12
    assert_eq!(problem.constraint_violation(start).unwrap(), 12.0);

    let text = problem.to_string();
    assert!(text.contains("hs71 cost (R^4 -> R^1)"));
    assert!(text.contains("Bounds: ([25, inf))"));
    assert!(text.contains("Bounds: ({40})"));
    assert!(text.contains("Starting value: [16]"));
}

#[test]
fn test_stub_bridge_round_trip() {
    let mut solver = Solver::new(hs71(), KnownOptimum { calls: 0 });
    assert_eq!(solver.result().tag(), ResultTag::NoSolution);

    let result = solver.minimum().unwrap().clone();
    assert_eq!(result.tag(), ResultTag::Result);

    let solution = result.solution().unwrap();
    assert_eq!(solution.x, hs71_solution());
    assert_relative_eq!(solution.value[0], 17.014_017_3, epsilon = 1e-6);
    assert_relative_eq!(solution.constraints[0], 25.0, epsilon = 1e-5);
    assert_relative_eq!(solution.constraints[1], 40.0, epsilon = 1e-5);
    assert!(solution.lambda.is_empty());

    // Memoized
    assert_eq!(solver.minimum().unwrap(), &result);
    assert_eq!(solver.bridge().calls, 1);

    // And again after a reset
    solver.reset();
    assert_eq!(solver.minimum().unwrap(), &result);
    assert_eq!(solver.bridge().calls, 2);
}

#[test]
fn test_solution_is_feasible() {
    let problem = hs71();
    let x = hs71_solution();

    assert!(problem.constraint_violation(&x).unwrap() < 1e-5);
    for (value, bound) in x.iter().zip(problem.argument_bounds()) {
        assert!(bound.contains(*value));
    }
}

#[test]
fn test_states_reach_the_callback() {
    let mut solver = Solver::new(hs71(), Interpolating);
    solver.set_parameter("steps", "number of interpolation steps", 4_i64);

    let history: Rc<RefCell<Vec<(f64, f64, f64)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&history);
    solver.set_iteration_callback(move |_problem, state| {
        let step = *state.get_parameter::<f64>("step").unwrap();
        sink.borrow_mut().push((
            step,
            state.cost().unwrap(),
            state.constraint_violation().unwrap(),
        ));
    });

    let result = solver.minimum().unwrap().clone();
    let history = history.borrow();

    assert_eq!(history.len(), 4);
    assert_eq!(history[0].0, 0.25);
    assert_eq!(history[3].0, 1.0);
    // Last iterate is the optimum
    assert_relative_eq!(history[3].1, 17.014_017_3, epsilon = 1e-6);
    assert!(history[3].2 < 1e-5);

    let solution = result.solution().unwrap();
    assert_relative_eq!(solution.x[1], 4.742_999_64, epsilon = 1e-12);
    assert_eq!(solution.lambda.len(), 2);
}

#[test]
fn test_bridge_failure_is_reported_as_data() {
    // No "steps" parameter
    let mut solver = Solver::new(hs71(), Interpolating);
    let result = solver.minimum().unwrap();

    assert_eq!(result.tag(), ResultTag::SolverError);
    assert!(result.solution().is_none());
    assert!(result.to_string().starts_with("Solver error: Parameter not found: steps"));
}

#[test]
fn test_solver_printing() {
    let mut solver = Solver::new(hs71(), KnownOptimum { calls: 0 });
    solver.set_parameter("max-iterations", "maximum number of iterations", 3000_i64);
    solver.minimum().unwrap();

    let text = solver.to_string();
    assert!(text.starts_with("Solver 'known-optimum':\nProblem:"));
    assert!(text.contains("max-iterations (maximum number of iterations): 3000"));
    assert!(text.contains("Result:\n  Size (input, output): 4, 1"));
}
