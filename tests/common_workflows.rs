//! Integration tests for common formkeeper workflows.
//!
//! These tests drive the facade crate end to end: rules loaded from files,
//! values decoded from a request and results queried the way handlers do.

use formkeeper::formkeeper_config::{FileFormat, RuleLoader, RuleSourceConfig};
use formkeeper::*;
use std::fs;
use tempfile::TempDir;

const SIGNIN_RULES: &str = r#"
forms:
  signin:
    fields:
      - name: username
        required: true
        message: invalid username
        filters: [trim, uppercase]
        constraints:
          - type: length
            criteria: { from: 3, to: 20 }
      - name: password
        required: true
        message: invalid password
        constraints:
          - type: length
            message: password length must be 8 to 100
            criteria: { from: 8, to: 100 }
  vote:
    selections:
      - name: choice
        message: choose one
        count: { from: 1, to: 1 }
        constraints:
          - type: included
            message: unknown choice
            criteria: { values: ["1", "2"] }
"#;

fn rule() -> Rule {
    RuleLoader::new(FileFormat::Yaml).parse(SIGNIN_RULES).unwrap()
}

fn engine() -> Engine {
    Engine::new().with_validator(
        "included",
        validator_fn(|value, criteria| Ok(criteria.strings("values")?.contains(&value))),
    )
}

// =============================================================================
// Form Validation Tests
// =============================================================================

#[test]
fn test_signin_from_query_string() {
    let input = FormValues::from_query("username=foobar&password=short").unwrap();
    let result = engine().validate(&rule(), "signin", &input).unwrap();

    assert_eq!(result.valid_param("username"), "FOOBAR");
    assert!(result.failed_on_constraint("password", "length"));
    assert!(!result.failed_on("username"));
    assert_eq!(result.messages(), vec!["invalid password"]);
}

#[test]
fn test_selection_fails_on_content_not_cardinality() {
    let input = FormValues::from_query("choice=3").unwrap();
    let result = engine().validate(&rule(), "vote", &input).unwrap();

    assert!(result.failed_on("choice"));
    assert!(result.failed_on_constraint("choice", "included"));
    assert!(!result.failed_on_constraint("choice", "required"));
    assert_eq!(result.message_on_constraint("choice", "included"), "unknown choice");
}

#[test]
fn test_selection_within_count_is_valid() {
    let input = FormValues::from_urlencoded(b"choice=1").unwrap();
    let result = engine().validate(&rule(), "vote", &input).unwrap();

    assert!(!result.has_failure());
    assert_eq!(result.valid_selection("choice"), &["1"]);
}

#[test]
fn test_unknown_form_is_an_error() {
    let input = FormValues::new();
    let err = engine().validate(&rule(), "signup", &input).unwrap_err();
    assert!(matches!(err, FormError::UnknownForm(name) if name == "signup"));
}

// =============================================================================
// Rule Source Tests
// =============================================================================

#[test]
fn test_rules_dir_round_trip_through_engine() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("forms.yml"), SIGNIN_RULES).unwrap();

    let rule = RuleSourceConfig::new(dir.path())
        .with_strict(true)
        .load_verified(&engine())
        .unwrap();

    let input = FormValues::from_pairs([("username", " ab "), ("password", "foobarfoobar")]);
    let result = engine().validate(&rule, "signin", &input).unwrap();

    assert_eq!(result.failed_fields(), vec!["username"]);
    assert_eq!(result.message_on("username"), "invalid username");
}

#[test]
fn test_result_serializes_for_api_responses() {
    let input = FormValues::from_query("username=&password=").unwrap();
    let result = engine().validate(&rule(), "signin", &input).unwrap();

    let json = result.to_json();
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "username");
    assert_eq!(errors[0]["constraints"][0]["constraint"], REQUIRED);

    let body = serde_json::to_string(&result).unwrap();
    assert!(body.contains("invalid password"));
}
