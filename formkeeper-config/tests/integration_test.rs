//! Integration tests for formkeeper-config

use formkeeper_config::*;
use formkeeper_core::{Engine, FormError, FormValues, validator_fn};
use std::fs;
use tempfile::TempDir;

const TEMPLATES_YAML: &str = r#"
fields:
  username:
    name: username
    required: true
    message: invalid username
    filters: [trim]
    constraints:
      - type: length
        criteria: { from: 3, to: 20 }
      - type: alnum
"#;

const FORMS_TOML: &str = r#"
[[forms.signin.fields]]
ref = "username"

[[forms.signin.fields]]
name = "password"
required = true
message = "invalid password"

[[forms.signin.fields.constraints]]
type = "length"
message = "password is too short"
criteria = { from = 8, to = 100 }
"#;

fn rules_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("00_templates.yml"), TEMPLATES_YAML).unwrap();
    fs::write(dir.path().join("10_forms.toml"), FORMS_TOML).unwrap();
    dir
}

#[test]
fn test_load_and_validate_from_dir() {
    let dir = rules_dir();
    let rule = load_rule_from_dir(dir.path(), false).unwrap();

    let input = FormValues::from_query("username=+foobar+&password=short").unwrap();
    let result = Engine::new().validate(&rule, "signin", &input).unwrap();

    assert_eq!(result.valid_param("username"), "foobar");
    assert!(result.failed_on_constraint("password", "length"));
    assert_eq!(
        result.message_on_constraint("password", "length"),
        "password is too short"
    );
}

#[test]
fn test_later_files_replace_earlier_ones() {
    let dir = rules_dir();
    fs::write(
        dir.path().join("20_override.json"),
        r#"{"fields": {"username": {"name": "login", "message": "bad login"}}}"#,
    )
    .unwrap();

    let rule = load_rule_from_dir(dir.path(), false).unwrap();
    assert_eq!(rule.fields["username"].name, "login");
    assert!(rule.forms.contains_key("signin"));
}

#[test]
fn test_nested_directories_are_walked() {
    let dir = rules_dir();
    let nested = dir.path().join("admin");
    fs::create_dir(&nested).unwrap();
    fs::write(
        nested.join("users.yaml"),
        "forms:\n  ban:\n    fields:\n      - ref: username\n",
    )
    .unwrap();

    let rule = load_rule_from_dir(dir.path(), false).unwrap();
    assert!(rule.form("ban").is_some());
    assert!(rule.form("signin").is_some());
}

#[test]
fn test_unknown_files_skipped_unless_strict() {
    let dir = rules_dir();
    fs::write(dir.path().join("README.md"), "# rules").unwrap();

    assert!(load_rule_from_dir(dir.path(), false).is_ok());
    assert!(matches!(
        load_rule_from_dir(dir.path(), true),
        Err(LoadError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.yml"), "fields: [not, a, map").unwrap();

    let err = load_rule_from_dir(dir.path(), false).unwrap_err();
    match err {
        LoadError::Parse { source_name, .. } => assert!(source_name.ends_with("broken.yml")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_dir_is_a_walk_error() {
    let dir = TempDir::new().unwrap();
    let err = load_rule_from_dir(dir.path().join("absent"), false).unwrap_err();
    assert!(matches!(err, LoadError::Walk(_)));
}

#[test]
fn test_load_verified_reports_unknown_validator() {
    let dir = rules_dir();
    fs::write(
        dir.path().join("30_vote.yml"),
        r#"
forms:
  vote:
    selections:
      - name: choice
        constraints:
          - type: included
            criteria: { values: ["1", "2"] }
"#,
    )
    .unwrap();
    let config = RuleSourceConfig::new(dir.path());

    let err = config.load_verified(&Engine::new()).unwrap_err();
    assert!(matches!(err, LoadError::Verify(FormError::UnknownValidator(ref name)) if name == "included"));

    let engine = Engine::new().with_validator(
        "included",
        validator_fn(|value, criteria| Ok(criteria.strings("values")?.contains(&value))),
    );
    assert!(config.load_verified(&engine).is_ok());
}

#[test]
fn test_auto_loader_single_file() {
    let dir = rules_dir();
    let path = dir.path().join("00_templates.yml");

    let loader = RuleLoader::auto(&path).unwrap();
    assert_eq!(loader.format(), FileFormat::Yaml);
    let rule = loader.load_file(&path).unwrap();
    assert_eq!(rule.fields["username"].constraints.len(), 2);
}

#[test]
fn test_from_dotenv() {
    let dir = rules_dir();
    let env_file = dir.path().join(".env");
    fs::write(
        &env_file,
        format!(
            "FORMKEEPER_RULES_DIR={}\nFORMKEEPER_STRICT=false\n",
            dir.path().display()
        ),
    )
    .unwrap();

    let config = RuleSourceConfig::from_dotenv(&env_file).unwrap();
    assert_eq!(config.rules_dir, dir.path());
    assert!(!config.strict);
}

#[test]
fn test_from_dotenv_missing_file() {
    let err = RuleSourceConfig::from_dotenv("/nonexistent/formkeeper/.env").unwrap_err();
    assert!(matches!(err, LoadError::Dotenv(_)));
}
