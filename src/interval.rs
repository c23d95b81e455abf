//! Bound intervals
//!
//! An [`Interval`] restricts an optimization variable or a constraint output
//! to `[lower, upper]`. Either side may be open (infinite), and both sides may
//! coincide to express an equality.

use std::f64::{INFINITY, NEG_INFINITY};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OptError, Result};

/// Lower/upper limits applied to an argument or to a constraint output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

/// One side of an interval as written to JSON: a number, `null` for an open
/// side, or a string for an infinite limit pointing inwards.
fn limit_to_json(value: f64, open: bool) -> serde_json::Value {
    if open {
        serde_json::Value::Null
    } else if value.is_finite() {
        serde_json::Value::from(value)
    } else {
        serde_json::Value::String(value.to_string())
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Interval", 2)?;
        state.serialize_field("lower", &limit_to_json(self.lower, !self.has_lower()))?;
        state.serialize_field("upper", &limit_to_json(self.upper, !self.has_upper()))?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Limit {
            Number(f64),
            Text(String),
        }

        impl Limit {
            fn value<E: serde::de::Error>(self) -> std::result::Result<f64, E> {
                match self {
                    Limit::Number(value) => Ok(value),
                    Limit::Text(text) => text
                        .parse::<f64>()
                        .map_err(|_| E::custom(format!("invalid interval limit: {}", text))),
                }
            }
        }

        #[derive(Deserialize)]
        struct IntervalHelper {
            #[serde(default)]
            lower: Option<Limit>,

            #[serde(default)]
            upper: Option<Limit>,
        }

        let helper = IntervalHelper::deserialize(deserializer)?;
        let lower = match helper.lower {
            Some(limit) => limit.value()?,
            None => NEG_INFINITY,
        };
        let upper = match helper.upper {
            Some(limit) => limit.value()?,
            None => INFINITY,
        };

        Interval::new(lower, upper).map_err(serde::de::Error::custom)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::free()
    }
}

impl Interval {
    /// Create an interval `[lower, upper]`.
    ///
    /// Fails with [`OptError::InvalidBound`] when `lower > upper` or when
    /// either limit is NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use optcore_rs::interval::Interval;
    ///
    /// let interval = Interval::new(1.0, 5.0).unwrap();
    /// assert_eq!(interval.lower(), 1.0);
    /// assert_eq!(interval.upper(), 5.0);
    /// assert!(Interval::new(5.0, 1.0).is_err());
    /// ```
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(OptError::InvalidBound { lower, upper });
        }

        Ok(Self { lower, upper })
    }

    /// The whole real line.
    pub fn free() -> Self {
        Self {
            lower: NEG_INFINITY,
            upper: INFINITY,
        }
    }

    /// `[lower, +∞)`
    pub fn lower_bounded(lower: f64) -> Result<Self> {
        Self::new(lower, INFINITY)
    }

    /// `(-∞, upper]`
    pub fn upper_bounded(upper: f64) -> Result<Self> {
        Self::new(NEG_INFINITY, upper)
    }

    /// `[value, value]`, i.e. an equality.
    pub fn exact(value: f64) -> Result<Self> {
        Self::new(value, value)
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `false` only for an open lower side at `-∞`.
    pub fn has_lower(&self) -> bool {
        !(self.lower.is_infinite() && self.lower.is_sign_negative())
    }

    /// `false` only for an open upper side at `+∞`.
    pub fn has_upper(&self) -> bool {
        !(self.upper.is_infinite() && self.upper.is_sign_positive())
    }

    /// `true` if neither side is limited.
    pub fn is_free(&self) -> bool {
        !self.has_lower() && !self.has_upper()
    }

    /// `true` if the interval collapses to a single value.
    pub fn is_equality(&self) -> bool {
        self.lower == self.upper
    }

    /// Check if a value lies within the interval (limits included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Distance from `value` to the interval, zero when contained.
    ///
    /// A NaN value is infinitely far from any interval.
    pub fn violation(&self, value: f64) -> f64 {
        if value.is_nan() {
            INFINITY
        } else if value < self.lower {
            self.lower - value
        } else if value > self.upper {
            value - self.upper
        } else {
            0.0
        }
    }

    /// Clamp a value to lie within the interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_equality() {
            return write!(f, "{{{}}}", self.lower);
        }
        let open = if self.has_lower() { '[' } else { '(' };
        let close = if self.has_upper() { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.lower, self.upper, close)
    }
}
