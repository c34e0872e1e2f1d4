// Validation engine

use crate::{
    Constraint, Criteria, Failure, FilterRegistry, FormError, ResolvedField, ResolvedSelection,
    Result, Rule, ValidationResult, Validator, ValidatorRegistry, ValueSource,
};
use tracing::{debug, trace};

/// Resolves, filters and validates the inputs of a form.
///
/// The engine owns its filter and validator registries, so differently
/// configured engines can live side by side. Validation only reads the
/// engine and the rule.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    filters: FilterRegistry,
    validators: ValidatorRegistry,
}

impl Engine {
    /// Create an engine with the built-in filters and validators
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with nothing registered
    pub fn empty() -> Self {
        Self::from_registries(FilterRegistry::empty(), ValidatorRegistry::empty())
    }

    pub fn from_registries(filters: FilterRegistry, validators: ValidatorRegistry) -> Self {
        Self {
            filters,
            validators,
        }
    }

    /// Add a filter
    pub fn with_filter<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.register_filter(name, filter);
        self
    }

    /// Add a validator
    pub fn with_validator<V>(mut self, name: impl Into<String>, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.register_validator(name, validator);
        self
    }

    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
    }

    pub fn register_validator<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: Validator + 'static,
    {
        self.validators.register(name, validator);
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Validate the submission of one form.
    ///
    /// Fields are checked first, then selections, each in declared order.
    /// Rule mistakes abort the call with an error and no partial result.
    pub fn validate<S>(&self, rule: &Rule, form_name: &str, source: &S) -> Result<ValidationResult>
    where
        S: ValueSource + ?Sized,
    {
        let form = rule
            .form(form_name)
            .ok_or_else(|| FormError::UnknownForm(form_name.to_string()))
            .inspect_err(|e| debug!(form = form_name, error = %e, "aborting validation"))?;

        let mut result = ValidationResult::new();

        for field in &form.fields {
            let field = rule.resolve_field(field);
            if field.name.is_empty() {
                let err = FormError::MissingFieldName {
                    form: form_name.to_string(),
                };
                debug!(form = form_name, error = %err, "aborting validation");
                return Err(err);
            }
            let raw = source.value(field.name).unwrap_or("");
            self.filters
                .apply_to(&field, raw)
                .and_then(|value| self.validate_field(&mut result, &field, value))
                .inspect_err(|e| {
                    debug!(form = form_name, field = field.name, error = %e, "aborting validation")
                })?;
        }

        for selection in &form.selections {
            let selection = rule.resolve_selection(selection);
            if selection.name.is_empty() {
                let err = FormError::MissingSelectionName {
                    form: form_name.to_string(),
                };
                debug!(form = form_name, error = %err, "aborting validation");
                return Err(err);
            }
            source
                .values(selection.name)
                .into_iter()
                .map(|raw| self.filters.apply_to(&selection, raw))
                .filter(|value| !matches!(value, Ok(v) if v.is_empty()))
                .collect::<Result<Vec<_>>>()
                .and_then(|values| self.validate_selection(&mut result, &selection, values))
                .inspect_err(|e| {
                    debug!(form = form_name, selection = selection.name, error = %e, "aborting validation")
                })?;
        }

        debug!(
            form = form_name,
            failures = result.failed_fields().len(),
            "validated form"
        );
        Ok(result)
    }

    /// Check a rule against the registries before serving requests.
    ///
    /// Every form must resolve to named fields and selections whose filters
    /// and constraint types are registered.
    pub fn verify(&self, rule: &Rule) -> Result<()> {
        let mut form_names: Vec<_> = rule.forms.keys().collect();
        form_names.sort();

        for form_name in form_names {
            let form = &rule.forms[form_name];

            for field in &form.fields {
                let field = rule.resolve_field(field);
                if field.name.is_empty() {
                    return Err(FormError::MissingFieldName {
                        form: form_name.clone(),
                    });
                }
                self.verify_names(field.filters, field.constraints)?;
            }

            for selection in &form.selections {
                let selection = rule.resolve_selection(selection);
                if selection.name.is_empty() {
                    return Err(FormError::MissingSelectionName {
                        form: form_name.clone(),
                    });
                }
                self.verify_names(selection.filters, selection.constraints)?;
            }
        }
        Ok(())
    }

    fn verify_names(&self, filters: &[String], constraints: &[Constraint]) -> Result<()> {
        if let Some(name) = filters.iter().find(|f| !self.filters.contains(f)) {
            return Err(FormError::UnknownFilter(name.clone()));
        }
        if let Some(c) = constraints.iter().find(|c| !self.validators.contains(&c.kind)) {
            return Err(FormError::UnknownValidator(c.kind.clone()));
        }
        Ok(())
    }

    fn validate_field(
        &self,
        result: &mut ValidationResult,
        field: &ResolvedField<'_>,
        value: String,
    ) -> Result<()> {
        if value.is_empty() {
            if field.required {
                trace!(field = field.name, "required field is empty");
                result.add_failure(Failure::required(field.name, field.message));
            } else {
                result.put_valid_field(field.name, value);
            }
            return Ok(());
        }

        let mut failure = Failure::new(field.name, field.message);
        for constraint in field.constraints {
            if !self.check(&value, &constraint.kind, &constraint.criteria)? {
                failure.fail_on(constraint.kind.as_str(), constraint.message.as_str());
                if !field.fall_through {
                    break;
                }
            }
        }

        if failure.is_empty() {
            trace!(field = field.name, "field is valid");
            result.put_valid_field(field.name, value);
        } else {
            trace!(field = field.name, constraints = failure.constraints.len(), "field failed");
            result.add_failure(failure);
        }
        Ok(())
    }

    fn validate_selection(
        &self,
        result: &mut ValidationResult,
        selection: &ResolvedSelection<'_>,
        values: Vec<String>,
    ) -> Result<()> {
        if !selection.count.contains(values.len()) {
            trace!(
                selection = selection.name,
                count = values.len(),
                "selection count out of bounds"
            );
            result.add_failure(Failure::required(selection.name, selection.message));
            return Ok(());
        }

        let mut failure = Failure::new(selection.name, selection.message);
        for value in &values {
            // first failing constraint ends the checks for this value
            for constraint in selection.constraints {
                if !self.check(value, &constraint.kind, &constraint.criteria)? {
                    failure.fail_on(constraint.kind.as_str(), constraint.message.as_str());
                    break;
                }
            }
        }

        if failure.is_empty() {
            trace!(selection = selection.name, count = values.len(), "selection is valid");
            result.put_valid_selection(selection.name, values);
        } else {
            trace!(selection = selection.name, "selection failed");
            result.add_failure(failure);
        }
        Ok(())
    }

    fn check(&self, value: &str, kind: &str, criteria: &Criteria) -> Result<bool> {
        self.validators.invoke(kind, value, criteria)
    }
}
