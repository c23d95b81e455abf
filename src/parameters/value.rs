//! Tagged parameter values
//!
//! A [`ParameterValue`] is one of a closed set of types. Typed access goes
//! through [`ParameterType`], which performs an explicit tag check and never
//! converts between types.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A value stored in a [`ParameterStore`](super::ParameterStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParameterValue {
    Float(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Vector(Array1<f64>),
}

impl ParameterValue {
    /// Name of the active tag, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Float(_) => f64::TYPE_NAME,
            ParameterValue::Integer(_) => i64::TYPE_NAME,
            ParameterValue::Bool(_) => bool::TYPE_NAME,
            ParameterValue::Text(_) => String::TYPE_NAME,
            ParameterValue::Vector(_) => <Array1<f64>>::TYPE_NAME,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "{}", v),
            ParameterValue::Integer(v) => write!(f, "{}", v),
            ParameterValue::Bool(v) => write!(f, "{}", v),
            ParameterValue::Text(v) => write!(f, "{}", v),
            ParameterValue::Vector(v) => write!(f, "{}", v),
        }
    }
}

/// A Rust type that maps onto exactly one [`ParameterValue`] tag.
pub trait ParameterType: Sized {
    /// Tag name reported on type mismatches.
    const TYPE_NAME: &'static str;

    /// Borrow the payload if `value` carries this type.
    fn from_value(value: &ParameterValue) -> Option<&Self>;

    /// Mutably borrow the payload if `value` carries this type.
    fn from_value_mut(value: &mut ParameterValue) -> Option<&mut Self>;

    fn into_value(self) -> ParameterValue;
}

macro_rules! impl_parameter_type {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl ParameterType for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: &ParameterValue) -> Option<&Self> {
                match value {
                    ParameterValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut ParameterValue) -> Option<&mut Self> {
                match value {
                    ParameterValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_value(self) -> ParameterValue {
                ParameterValue::$variant(self)
            }
        }

        impl From<$ty> for ParameterValue {
            fn from(value: $ty) -> Self {
                ParameterValue::$variant(value)
            }
        }
    };
}

impl_parameter_type!(f64, Float, "float");
impl_parameter_type!(i64, Integer, "integer");
impl_parameter_type!(bool, Bool, "bool");
impl_parameter_type!(String, Text, "text");
impl_parameter_type!(Array1<f64>, Vector, "vector");

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}
