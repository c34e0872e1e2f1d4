// Form validation example
//
// Usage:
//   cargo run --example validate_form -- signin "username=foobar&password=short"
//
// Rules are read from FORMKEEPER_RULES_DIR, falling back to demos/rules.

use formkeeper::formkeeper_config::RuleSourceConfig;
use formkeeper::{Engine, FormValues, validator_fn};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let form = args.next().unwrap_or_else(|| "signin".to_string());
    let query = args
        .next()
        .unwrap_or_else(|| "username=+foobar+&password=short".to_string());

    let engine = Engine::new().with_validator(
        "included",
        validator_fn(|value, criteria| Ok(criteria.strings("values")?.contains(&value))),
    );

    let mut config = RuleSourceConfig::from_env();
    if env::var("FORMKEEPER_RULES_DIR").is_err() {
        config.rules_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/rules").into();
    }
    let rule = config.load_verified(&engine)?;

    let input = FormValues::from_query(&query)?;
    let result = engine.validate(&rule, &form, &input)?;

    println!("=== Form '{}' ===", form);
    for name in input.names() {
        if !result.failed_on(name) {
            println!("  ok    {} = {:?}", name, result.valid_param(name));
        }
    }
    for name in result.failed_fields() {
        println!("  fail  {}: {}", name, result.message_on(name));
        for constraint in result.failed_constraints_on(name) {
            println!(
                "          {} -> {}",
                constraint,
                result.message_on_constraint(name, constraint)
            );
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&result.to_json())?);
    Ok(())
}
