// Constraint criteria

use crate::CriteriaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single criteria value as written in a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<CriteriaValue>),
}

impl From<bool> for CriteriaValue {
    fn from(value: bool) -> Self {
        CriteriaValue::Bool(value)
    }
}

impl From<i64> for CriteriaValue {
    fn from(value: i64) -> Self {
        CriteriaValue::Int(value)
    }
}

impl From<i32> for CriteriaValue {
    fn from(value: i32) -> Self {
        CriteriaValue::Int(i64::from(value))
    }
}

impl From<f64> for CriteriaValue {
    fn from(value: f64) -> Self {
        CriteriaValue::Float(value)
    }
}

impl From<&str> for CriteriaValue {
    fn from(value: &str) -> Self {
        CriteriaValue::Str(value.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(value: String) -> Self {
        CriteriaValue::Str(value)
    }
}

impl<T: Into<CriteriaValue>> From<Vec<T>> for CriteriaValue {
    fn from(values: Vec<T>) -> Self {
        CriteriaValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Key/value bag a constraint passes to its validator.
///
/// Every typed accessor fails with [`CriteriaError::Missing`] when the key is
/// absent and [`CriteriaError::WrongType`] when it holds something else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria {
    values: HashMap<String, CriteriaValue>,
}

impl Criteria {
    /// Create an empty criteria bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CriteriaValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any previous one under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CriteriaValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value lookup
    pub fn get(&self, key: &str) -> Option<&CriteriaValue> {
        self.values.get(key)
    }

    pub fn bool(&self, key: &str) -> Result<bool, CriteriaError> {
        match self.lookup(key)? {
            CriteriaValue::Bool(v) => Ok(*v),
            _ => Err(wrong_type(key, "bool")),
        }
    }

    pub fn int(&self, key: &str) -> Result<i64, CriteriaError> {
        match self.lookup(key)? {
            CriteriaValue::Int(v) => Ok(*v),
            _ => Err(wrong_type(key, "int")),
        }
    }

    /// Numeric lookup that also accepts integers
    pub fn float(&self, key: &str) -> Result<f64, CriteriaError> {
        match self.lookup(key)? {
            CriteriaValue::Float(v) => Ok(*v),
            CriteriaValue::Int(v) => Ok(*v as f64),
            _ => Err(wrong_type(key, "float")),
        }
    }

    pub fn string(&self, key: &str) -> Result<&str, CriteriaError> {
        match self.lookup(key)? {
            CriteriaValue::Str(v) => Ok(v.as_str()),
            _ => Err(wrong_type(key, "string")),
        }
    }

    /// List lookup where every element must be a string
    pub fn strings(&self, key: &str) -> Result<Vec<&str>, CriteriaError> {
        match self.lookup(key)? {
            CriteriaValue::List(items) => items
                .iter()
                .map(|item| match item {
                    CriteriaValue::Str(s) => Ok(s.as_str()),
                    _ => Err(wrong_type(key, "list of strings")),
                })
                .collect(),
            _ => Err(wrong_type(key, "list of strings")),
        }
    }

    fn lookup(&self, key: &str) -> Result<&CriteriaValue, CriteriaError> {
        self.values
            .get(key)
            .ok_or_else(|| CriteriaError::Missing(key.to_string()))
    }
}

fn wrong_type(key: &str, expected: &'static str) -> CriteriaError {
    CriteriaError::WrongType {
        key: key.to_string(),
        expected,
    }
}
