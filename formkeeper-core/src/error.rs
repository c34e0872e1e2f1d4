// Configuration errors raised while validating a form

use thiserror::Error;

/// Error aborting a whole validation call.
///
/// These describe mistakes in rule authoring or engine setup. Bad user input
/// never shows up here; it is recorded in the [`ValidationResult`](crate::ValidationResult).
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Form rule not found: {0}")]
    UnknownForm(String),

    #[error("Field name not found on a rule for form '{form}'")]
    MissingFieldName { form: String },

    #[error("Selection name not found on a rule for form '{form}'")]
    MissingSelectionName { form: String },

    #[error("Validator not found: {0}")]
    UnknownValidator(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Malformed criteria for constraint '{constraint}': {source}")]
    MalformedCriteria {
        constraint: String,
        #[source]
        source: CriteriaError,
    },

    #[error("Invalid form data: {0}")]
    InvalidFormData(String),
}

/// Problem with the criteria bag handed to a validator
#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("Param not found '{0}'")]
    Missing(String),

    #[error("Couldn't read '{key}' as {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("Criteria for '{0}' not enough")]
    Insufficient(&'static str),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
