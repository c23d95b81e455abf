//! Named parameter store
//!
//! A [`ParameterStore`] maps string keys to a human readable description and
//! a tagged value. Lookup is by key only; the description is used for
//! reporting. Insertion order is preserved when iterating and printing.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::{ParameterType, ParameterValue};
use crate::error::{OptError, Result};

/// A described, tagged value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Human readable description, never used for lookup
    pub description: String,

    /// The stored value
    pub value: ParameterValue,
}

impl Parameter {
    pub fn new(description: &str, value: impl Into<ParameterValue>) -> Self {
        Self {
            description: description.to_string(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): {}", self.description, self.value)
    }
}

/// Insertion-ordered collection of named parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterStore {
    entries: IndexMap<String, Parameter>,
}

impl ParameterStore {
    /// Create an empty store
    ///
    /// # Examples
    ///
    /// ```
    /// use optcore_rs::parameters::ParameterStore;
    ///
    /// let mut store = ParameterStore::new();
    /// store.set("max-iterations", "maximum number of iterations", 3000_i64);
    ///
    /// assert_eq!(*store.get::<i64>("max-iterations").unwrap(), 3000);
    /// assert!(store.get::<f64>("max-iterations").is_err());
    /// assert!(store.get::<i64>("tolerance").is_err());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace the parameter `key`.
    ///
    /// A replaced parameter keeps its original position and is returned.
    pub fn set(
        &mut self,
        key: &str,
        description: &str,
        value: impl Into<ParameterValue>,
    ) -> Option<Parameter> {
        self.entries
            .insert(key.to_string(), Parameter::new(description, value))
    }

    /// Remove `key`, keeping the order of the remaining parameters.
    pub fn remove(&mut self, key: &str) -> Option<Parameter> {
        self.entries.shift_remove(key)
    }

    /// The full entry (description and tagged value) for `key`.
    pub fn entry(&self, key: &str) -> Result<&Parameter> {
        self.entries
            .get(key)
            .ok_or_else(|| OptError::KeyNotFound(key.to_string()))
    }

    /// Typed access to the value of `key`.
    ///
    /// Fails with [`OptError::KeyNotFound`] if `key` is absent, and with
    /// [`OptError::TypeMismatch`] if the stored value is not a `T`.
    pub fn get<T: ParameterType>(&self, key: &str) -> Result<&T> {
        let parameter = self.entry(key)?;
        T::from_value(&parameter.value).ok_or_else(|| OptError::TypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found: parameter.value.type_name(),
        })
    }

    /// Typed mutable access to the value of `key`.
    ///
    /// Same failure modes as [`get`](ParameterStore::get).
    pub fn get_mut<T: ParameterType>(&mut self, key: &str) -> Result<&mut T> {
        let parameter = self
            .entries
            .get_mut(key)
            .ok_or_else(|| OptError::KeyNotFound(key.to_string()))?;
        let found = parameter.value.type_name();
        T::from_value_mut(&mut parameter.value).ok_or_else(|| OptError::TypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found,
        })
    }

    /// Iterate over `(key, parameter)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Parameter)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Serialize the store to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a store from a JSON string produced by [`to_json`](ParameterStore::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameters:")?;
        for (key, parameter) in self.iter() {
            write!(f, "\n  {} {}", key, parameter)?;
        }
        Ok(())
    }
}
