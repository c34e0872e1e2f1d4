// Input filters applied before validation

use crate::{FormError, Result};
use std::collections::HashMap;
use std::sync::Arc;

type FilterFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Anything that names an ordered list of filters
pub trait HasFilters {
    fn filter_names(&self) -> &[String];
}

/// Named string transforms
///
/// ```
/// use formkeeper_core::FilterRegistry;
///
/// let mut filters = FilterRegistry::new();
/// filters.register("reverse", |value| value.chars().rev().collect());
///
/// let names = vec!["trim".to_string(), "reverse".to_string()];
/// assert_eq!(filters.apply(&names, "  abc ").unwrap(), "cba");
/// ```
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// Create a registry holding the built-in filters
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("trim", |value| value.trim().to_string());
        registry.register("lowercase", |value| value.to_lowercase());
        registry.register("uppercase", |value| value.to_uppercase());
        registry
    }

    /// Create a registry with no filters at all
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Register a filter, replacing any filter with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Run `input` through every named filter in order
    pub fn apply(&self, names: &[String], input: &str) -> Result<String> {
        let mut value = input.to_string();
        for name in names {
            let filter = self
                .filters
                .get(name)
                .ok_or_else(|| FormError::UnknownFilter(name.clone()))?;
            value = filter(&value);
        }
        Ok(value)
    }

    /// Filter a value using the filters a field or selection names
    pub fn apply_to(&self, rule: &impl HasFilters, input: &str) -> Result<String> {
        self.apply(rule.filter_names(), input)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry").field("filters", &names).finish()
    }
}
