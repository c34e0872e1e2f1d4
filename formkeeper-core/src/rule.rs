// Rule model: fields, selections, forms and the templates they reference

use crate::{Criteria, CriteriaValue, HasFilters};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One named check on a value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Validator name
    #[serde(rename = "type")]
    pub kind: String,

    /// Message reported when this constraint fails
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub criteria: Criteria,
}

impl Constraint {
    /// Create a constraint for the named validator
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set the failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a criteria entry
    pub fn with_criterion(
        mut self,
        key: impl Into<String>,
        value: impl Into<CriteriaValue>,
    ) -> Self {
        self.criteria.insert(key, value);
        self
    }
}

/// Inclusive bounds on how many values a selection accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub from: usize,
    pub to: usize,
}

impl Count {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.from && count <= self.to
    }
}

impl Default for Count {
    /// Any number of values, none included
    fn default() -> Self {
        Self {
            from: 0,
            to: usize::MAX,
        }
    }
}

/// Single-value input definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,

    /// Name of a template in [`Rule::fields`]
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub filters: Vec<String>,

    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// Keep checking constraints after the first failure
    #[serde(default, rename = "fallthrough", alias = "fall_through")]
    pub fall_through: bool,
}

impl Field {
    /// Create a field for the named input
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a field that inherits from a template
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_fall_through(mut self, fall_through: bool) -> Self {
        self.fall_through = fall_through;
        self
    }
}

/// Multi-value input definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub name: String,

    /// Name of a template in [`Rule::selections`]
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Accepted number of values; unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Count>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub filters: Vec<String>,

    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Selection {
    /// Create a selection for the named input
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a selection that inherits from a template
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_count(mut self, from: usize, to: usize) -> Self {
        self.count = Some(Count::new(from, to));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Fields and selections making up one submittable form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default)]
    pub selections: Vec<Selection>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selections.push(selection);
        self
    }
}

/// Template registry plus the forms built from it.
///
/// A rule is read-only while validating, so one instance can be shared by
/// any number of concurrent callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub fields: HashMap<String, Field>,

    #[serde(default)]
    pub selections: HashMap<String, Selection>,

    #[serde(default)]
    pub forms: HashMap<String, Form>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field template
    pub fn with_field(mut self, key: impl Into<String>, field: Field) -> Self {
        self.fields.insert(key.into(), field);
        self
    }

    /// Add a selection template
    pub fn with_selection(mut self, key: impl Into<String>, selection: Selection) -> Self {
        self.selections.insert(key.into(), selection);
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, form: Form) -> Self {
        self.forms.insert(name.into(), form);
        self
    }

    pub fn form(&self, name: &str) -> Option<&Form> {
        self.forms.get(name)
    }

    /// Fold another rule into this one; entries in `other` win on key clashes
    pub fn merge(&mut self, other: Rule) {
        self.fields.extend(other.fields);
        self.selections.extend(other.selections);
        self.forms.extend(other.forms);
    }

    /// Resolve a field's template reference without touching either side.
    ///
    /// Name and message stay local when set. Required-ness, filters and
    /// constraints always come from the template. An unknown reference
    /// leaves the field as written.
    pub fn resolve_field<'a>(&'a self, field: &'a Field) -> ResolvedField<'a> {
        let local = ResolvedField {
            name: &field.name,
            message: &field.message,
            required: field.required,
            filters: &field.filters,
            constraints: &field.constraints,
            fall_through: field.fall_through,
        };

        match field.reference.as_deref().and_then(|r| self.fields.get(r)) {
            Some(template) => ResolvedField {
                name: or_template(&field.name, &template.name),
                message: or_template(&field.message, &template.message),
                required: template.required,
                filters: &template.filters,
                constraints: &template.constraints,
                ..local
            },
            None => local,
        }
    }

    /// Selection counterpart of [`Rule::resolve_field`]; the count follows
    /// the template like required-ness does for fields.
    pub fn resolve_selection<'a>(&'a self, selection: &'a Selection) -> ResolvedSelection<'a> {
        let local = ResolvedSelection {
            name: &selection.name,
            message: &selection.message,
            count: selection.count.unwrap_or_default(),
            filters: &selection.filters,
            constraints: &selection.constraints,
        };

        match selection
            .reference
            .as_deref()
            .and_then(|r| self.selections.get(r))
        {
            Some(template) => ResolvedSelection {
                name: or_template(&selection.name, &template.name),
                message: or_template(&selection.message, &template.message),
                count: template.count.unwrap_or_default(),
                filters: &template.filters,
                constraints: &template.constraints,
            },
            None => local,
        }
    }
}

fn or_template<'a>(local: &'a str, template: &'a str) -> &'a str {
    if local.is_empty() { template } else { local }
}

/// A field with its template reference applied
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    pub name: &'a str,
    pub message: &'a str,
    pub required: bool,
    pub filters: &'a [String],
    pub constraints: &'a [Constraint],
    pub fall_through: bool,
}

/// A selection with its template reference applied
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection<'a> {
    pub name: &'a str,
    pub message: &'a str,
    pub count: Count,
    pub filters: &'a [String],
    pub constraints: &'a [Constraint],
}

impl HasFilters for ResolvedField<'_> {
    fn filter_names(&self) -> &[String] {
        self.filters
    }
}

impl HasFilters for ResolvedSelection<'_> {
    fn filter_names(&self) -> &[String] {
        self.filters
    }
}
