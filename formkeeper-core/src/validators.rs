// Built-in validators

use crate::{Criteria, CriteriaError, FormError};
use lettre::message::Mailbox;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

static ALPHABET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALNUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-zA-Z]+$").unwrap());

static ASCII_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\x20-\x7E]+$").unwrap());

static ASCII_WITHOUT_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\x21-\x7E]+$").unwrap());

static LOOSE_EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Za-z_][-.+0-9A-Za-z_]*[0-9A-Za-z_]@[0-9A-Za-z_][-.0-9A-Za-z_]*[0-9A-Za-z_]\.[0-9A-Za-z_]{2,3}$")
        .unwrap()
});

static URI_SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*$").unwrap());

// Base for origin-form request targets such as "/search?q=1"
static REQUEST_BASE: Lazy<Url> = Lazy::new(|| Url::parse("http://localhost/").unwrap());

/// A named check run against one submitted value.
///
/// Returning `Ok(false)` means the value failed. An `Err` means the criteria
/// bag itself is unusable and aborts the whole validation call.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &str, criteria: &Criteria) -> Result<bool, CriteriaError>;
}

impl<F> Validator for F
where
    F: Fn(&str, &Criteria) -> Result<bool, CriteriaError> + Send + Sync,
{
    fn validate(&self, value: &str, criteria: &Criteria) -> Result<bool, CriteriaError> {
        self(value, criteria)
    }
}

/// Pin a closure to the validator signature so its argument and error types
/// are inferred
///
/// ```
/// use formkeeper_core::{Criteria, ValidatorRegistry, validator_fn};
///
/// let mut registry = ValidatorRegistry::new();
/// registry.register(
///     "included",
///     validator_fn(|value, criteria| Ok(criteria.strings("values")?.contains(&value))),
/// );
///
/// let criteria = Criteria::new().with("values", vec!["1", "2"]);
/// assert!(registry.invoke("included", "1", &criteria).unwrap());
/// ```
pub fn validator_fn<F>(f: F) -> impl Validator
where
    F: Fn(&str, &Criteria) -> Result<bool, CriteriaError> + Send + Sync,
{
    f
}

// Shared by `length` and `rune_count`: `eq`, or an inclusive `from`..`to` range
fn count_matches(
    validator: &'static str,
    count: usize,
    criteria: &Criteria,
) -> Result<bool, CriteriaError> {
    let count = count as i64;
    if criteria.has("eq") {
        Ok(count == criteria.int("eq")?)
    } else if criteria.has("from") && criteria.has("to") {
        let from = criteria.int("from")?;
        let to = criteria.int("to")?;
        Ok(count >= from && count <= to)
    } else {
        Err(CriteriaError::Insufficient(validator))
    }
}

/// Byte length, `eq` or `from`/`to`
pub struct Length;

impl Validator for Length {
    fn validate(&self, value: &str, criteria: &Criteria) -> Result<bool, CriteriaError> {
        count_matches("length", value.len(), criteria)
    }
}

/// Unicode code point count, `eq` or `from`/`to`
pub struct RuneCount;

impl Validator for RuneCount {
    fn validate(&self, value: &str, criteria: &Criteria) -> Result<bool, CriteriaError> {
        count_matches("rune_count", value.chars().count(), criteria)
    }
}

/// Letters only
pub struct Alphabet;

impl Validator for Alphabet {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(ALPHABET_REGEX.is_match(value))
    }
}

/// Letters and digits only
pub struct Alnum;

impl Validator for Alnum {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(ALNUM_REGEX.is_match(value))
    }
}

/// Printable ASCII, space included
pub struct Ascii;

impl Validator for Ascii {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(ASCII_REGEX.is_match(value))
    }
}

/// Printable ASCII without space
pub struct AsciiWithoutSpace;

impl Validator for AsciiWithoutSpace {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(ASCII_WITHOUT_SPACE_REGEX.is_match(value))
    }
}

/// Pattern match against the required `regex` criterion.
///
/// The pattern is searched for anywhere in the value; anchor it with `^`/`$`
/// to match the whole value. Compiled patterns are kept by source string.
#[derive(Default)]
pub struct Pattern {
    compiled: RwLock<HashMap<String, Regex>>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, source: &str) -> Result<Regex, CriteriaError> {
        if let Some(regex) = self.compiled.read().get(source) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(source)?;
        self.compiled
            .write()
            .insert(source.to_string(), regex.clone());
        Ok(regex)
    }
}

impl Validator for Pattern {
    fn validate(&self, value: &str, criteria: &Criteria) -> Result<bool, CriteriaError> {
        if !criteria.has("regex") {
            return Err(CriteriaError::Insufficient("regex"));
        }
        Ok(self.compile(criteria.string("regex")?)?.is_match(value))
    }
}

/// Absolute URI, an absolute path, or `*`, as accepted in a request line
pub struct RequestUri;

impl Validator for RequestUri {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        if value == "*" {
            return Ok(true);
        }
        if value.starts_with('/') {
            return Ok(Url::options()
                .base_url(Some(&REQUEST_BASE))
                .parse(value)
                .is_ok());
        }
        if Url::parse(value).is_ok() {
            return Ok(true);
        }
        // "scheme://" with an empty authority, which Url rejects for http(s)
        Ok(match value.split_once("://") {
            Some((scheme, rest))
                if URI_SCHEME_REGEX.is_match(scheme)
                    && (rest.is_empty() || rest.starts_with('/')) =>
            {
                Url::parse(&format!("{}://localhost{}", scheme, rest)).is_ok()
            }
            _ => false,
        })
    }
}

/// RFC 5322 mailbox, either `user@host` or `Name <user@host>`
pub struct Email;

impl Validator for Email {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(value.parse::<Mailbox>().is_ok())
    }
}

/// Permissive `local@domain.tld` shape with a two or three letter TLD
pub struct LooseEmail;

impl Validator for LooseEmail {
    fn validate(&self, value: &str, _: &Criteria) -> Result<bool, CriteriaError> {
        Ok(LOOSE_EMAIL_REGEX.is_match(value))
    }
}

/// Validators addressed by constraint type
#[derive(Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Create a registry holding the built-in validators
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("length", Length);
        registry.register("rune_count", RuneCount);
        registry.register("alphabet", Alphabet);
        registry.register("alnum", Alnum);
        registry.register("ascii", Ascii);
        registry.register("ascii_without_space", AsciiWithoutSpace);
        registry.register("regex", Pattern::new());
        registry.register("url", RequestUri);
        registry.register("email", Email);
        registry.register("loose_email", LooseEmail);
        registry
    }

    /// Create a registry with no validators at all
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Register a validator, replacing any validator with the same name
    pub fn register<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: Validator + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Run the named validator
    pub fn invoke(&self, name: &str, value: &str, criteria: &Criteria) -> crate::Result<bool> {
        let validator = self
            .validators
            .get(name)
            .ok_or_else(|| FormError::UnknownValidator(name.to_string()))?;

        validator
            .validate(value, criteria)
            .map_err(|source| FormError::MalformedCriteria {
                constraint: name.to_string(),
                source,
            })
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}
