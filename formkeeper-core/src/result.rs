// Validation outcome for one form submission

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Constraint type recorded for empty required fields and selections whose
/// value count is out of bounds
pub const REQUIRED: &str = "required";

/// One failed constraint on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintFailure {
    pub constraint_type: String,
    pub message: String,
}

/// Why one field or selection did not validate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub field_name: String,

    /// Field-level fallback message
    pub message: String,

    /// At most one entry per constraint type
    pub constraints: IndexMap<String, ConstraintFailure>,
}

impl Failure {
    /// Create an empty failure for a field
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
            constraints: IndexMap::new(),
        }
    }

    /// Failure for a missing value or a selection count out of bounds
    pub fn required(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut failure = Self::new(field_name, message);
        let message = failure.message.clone();
        failure.fail_on(REQUIRED, message);
        failure
    }

    /// Record a failed constraint; a repeat of the same type replaces the
    /// earlier entry
    pub fn fail_on(&mut self, constraint_type: impl Into<String>, message: impl Into<String>) {
        let constraint_type = constraint_type.into();
        self.constraints.insert(
            constraint_type.clone(),
            ConstraintFailure {
                constraint_type,
                message: message.into(),
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Valid values and failures gathered while validating a form.
///
/// A name appears in exactly one of the valid field values, the valid
/// selection values or the failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    valid_fields: HashMap<String, String>,
    valid_selections: HashMap<String, Vec<String>>,
    failures: IndexMap<String, Failure>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put_valid_field(&mut self, name: &str, value: String) {
        self.forget(name);
        self.valid_fields.insert(name.to_string(), value);
    }

    pub(crate) fn put_valid_selection(&mut self, name: &str, values: Vec<String>) {
        self.forget(name);
        self.valid_selections.insert(name.to_string(), values);
    }

    /// Record a failure under its field name
    pub fn add_failure(&mut self, failure: Failure) {
        let name = failure.field_name.clone();
        self.forget(&name);
        self.failures.insert(name, failure);
    }

    fn forget(&mut self, name: &str) {
        self.valid_fields.remove(name);
        self.valid_selections.remove(name);
        self.failures.shift_remove(name);
    }

    /// Validated value of a field, empty if the field is absent or failed
    pub fn valid_param(&self, name: &str) -> &str {
        self.valid_fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Validated values of a selection, empty if absent or failed
    pub fn valid_selection(&self, name: &str) -> &[String] {
        self.valid_selections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn valid_params(&self) -> &HashMap<String, String> {
        &self.valid_fields
    }

    pub fn valid_selections(&self) -> &HashMap<String, Vec<String>> {
        &self.valid_selections
    }

    pub fn has_failure(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failed_on(&self, name: &str) -> bool {
        self.failures.contains_key(name)
    }

    pub fn failed_on_constraint(&self, name: &str, constraint_type: &str) -> bool {
        self.failures
            .get(name)
            .is_some_and(|f| f.constraints.contains_key(constraint_type))
    }

    pub fn failure(&self, name: &str) -> Option<&Failure> {
        self.failures.get(name)
    }

    /// Failures in the order they were recorded
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.failures.values()
    }

    /// Names of failed fields in the order they failed
    pub fn failed_fields(&self) -> Vec<&str> {
        self.failures.keys().map(String::as_str).collect()
    }

    pub fn failed_constraints_on(&self, name: &str) -> Vec<&str> {
        self.failures
            .get(name)
            .map(|f| f.constraints.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Distinct field-level messages of all failures, sorted
    pub fn messages(&self) -> Vec<String> {
        sorted_unique(self.failures.values().map(|f| f.message.as_str()))
    }

    /// Field-level message of one failure, empty if it did not fail
    pub fn message_on(&self, name: &str) -> &str {
        self.failures
            .get(name)
            .map(|f| f.message.as_str())
            .unwrap_or("")
    }

    /// Distinct constraint messages of one failure, sorted
    pub fn messages_on(&self, name: &str) -> Vec<String> {
        match self.failures.get(name) {
            Some(failure) => {
                sorted_unique(failure.constraints.values().map(|c| c.message.as_str()))
            }
            None => Vec::new(),
        }
    }

    /// Message for one failed constraint.
    ///
    /// Falls back to the field-level message when the constraint carries no
    /// message of its own or did not fail, and to an empty string when the
    /// field did not fail at all.
    pub fn message_on_constraint(&self, name: &str, constraint_type: &str) -> &str {
        let Some(failure) = self.failures.get(name) else {
            return "";
        };
        match failure.constraints.get(constraint_type) {
            Some(constraint) if !constraint.message.is_empty() => &constraint.message,
            _ => &failure.message,
        }
    }

    /// Convert failures to JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.failures.values().map(|f| {
                serde_json::json!({
                    "field": f.field_name,
                    "message": f.message,
                    "constraints": f.constraints.values().map(|c| {
                        serde_json::json!({
                            "constraint": c.constraint_type,
                            "message": c.message,
                        })
                    }).collect::<Vec<_>>(),
                })
            }).collect::<Vec<_>>()
        })
    }
}

fn sorted_unique<'a>(messages: impl Iterator<Item = &'a str>) -> Vec<String> {
    messages
        .filter(|m| !m.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
