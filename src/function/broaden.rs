//! Conversions of shared function handles to less informative tiers.
//!
//! `T: Broaden<dyn X>` means an `Arc<T>` can be re-expressed as an
//! `Arc<dyn X>`. Implementations exist only towards tiers that promise less
//! derivative information, so broadening a [`Problem`](crate::problem::Problem)
//! in the wrong direction does not compile:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use optcore_rs::function::{Broaden, DerivableFunction, TwiceDerivableFunction};
//!
//! fn narrow(f: Arc<dyn DerivableFunction>) -> Arc<dyn TwiceDerivableFunction> {
//!     f.broaden()
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use super::{
    DerivableFunction, Function, LinearFunction, QuadraticFunction, TwiceDerivableFunction,
};

/// Re-express a shared function as a `T`, where `T` is the same or a less
/// informative tier.
pub trait Broaden<T: ?Sized> {
    fn broaden(self: Arc<Self>) -> Arc<T>;
}

macro_rules! broaden_sized {
    ($($tier:ident),+) => {
        $(
            impl<T: $tier + 'static> Broaden<dyn $tier> for T {
                fn broaden(self: Arc<Self>) -> Arc<dyn $tier> {
                    self
                }
            }
        )+
    };
}

macro_rules! broaden_dyn {
    ($from:ident => $($to:ident),+) => {
        $(
            impl Broaden<dyn $to> for dyn $from {
                fn broaden(self: Arc<Self>) -> Arc<dyn $to> {
                    self
                }
            }
        )+
    };
}

broaden_sized!(
    Function,
    DerivableFunction,
    TwiceDerivableFunction,
    QuadraticFunction,
    LinearFunction
);

broaden_dyn!(Function => Function);
broaden_dyn!(DerivableFunction => Function, DerivableFunction);
broaden_dyn!(TwiceDerivableFunction => Function, DerivableFunction, TwiceDerivableFunction);
broaden_dyn!(
    QuadraticFunction => Function, DerivableFunction, TwiceDerivableFunction, QuadraticFunction
);
broaden_dyn!(LinearFunction => Function, DerivableFunction, LinearFunction);

// The quadratic tiers of a linear function come from blanket impls rather
// than supertraits, so a trait object needs a sized handle to get there.
impl Broaden<dyn TwiceDerivableFunction> for dyn LinearFunction {
    fn broaden(self: Arc<Self>) -> Arc<dyn TwiceDerivableFunction> {
        Arc::new(SharedLinear(self))
    }
}

impl Broaden<dyn QuadraticFunction> for dyn LinearFunction {
    fn broaden(self: Arc<Self>) -> Arc<dyn QuadraticFunction> {
        Arc::new(SharedLinear(self))
    }
}

/// Sized handle around a shared linear function.
struct SharedLinear(Arc<dyn LinearFunction>);

impl Function for SharedLinear {
    fn input_size(&self) -> usize {
        self.0.input_size()
    }

    fn output_size(&self) -> usize {
        self.0.output_size()
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn compute(&self, x: &Array1<f64>) -> Array1<f64> {
        self.0.compute(x)
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.describe(f)
    }
}

impl DerivableFunction for SharedLinear {
    fn compute_gradient(&self, x: &Array1<f64>, i: usize) -> Array1<f64> {
        self.0.compute_gradient(x, i)
    }

    fn compute_jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        self.0.compute_jacobian(x)
    }
}

impl LinearFunction for SharedLinear {}
