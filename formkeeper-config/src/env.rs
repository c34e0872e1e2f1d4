// Environment driven rule source settings

use crate::loader::load_rule_from_dir;
use crate::{LoadError, Result};
use formkeeper_core::{Engine, Rule};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every variable read by [`RuleSourceConfig::from_env`]
pub const ENV_PREFIX: &str = "FORMKEEPER";

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = self.full_key(key);
        env::var(&full_key).map_err(|source| LoadError::Env {
            key: full_key,
            source,
        })
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Load a flag. Unset or unrecognised values give `default`.
    pub fn load_bool_or(&self, key: &str, default: bool) -> bool {
        self.load_var(key)
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Where rule files live and how strictly the directory is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSourceConfig {
    pub rules_dir: PathBuf,
    pub strict: bool,
}

impl Default for RuleSourceConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("rules"),
            strict: false,
        }
    }
}

impl RuleSourceConfig {
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read `FORMKEEPER_RULES_DIR` and `FORMKEEPER_STRICT`
    pub fn from_env() -> Self {
        Self::from_loader(&EnvLoader::default())
    }

    pub fn from_loader(loader: &EnvLoader) -> Self {
        let defaults = Self::default();
        let rules_dir = loader
            .load_var("RULES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.rules_dir);

        Self {
            rules_dir,
            strict: loader.load_bool_or("STRICT", defaults.strict),
        }
    }

    /// Load a `.env` file into the process environment, then read it.
    ///
    /// Variables already set in the environment take precedence.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::from_path(path.as_ref())?;
        Ok(Self::from_env())
    }

    /// Load and merge every rule file under `rules_dir`
    pub fn load(&self) -> Result<Rule> {
        debug!(dir = %self.rules_dir.display(), strict = self.strict, "loading form rules");
        load_rule_from_dir(&self.rules_dir, self.strict)
    }

    /// Load the rules and check every name they use against `engine`
    pub fn load_verified(&self, engine: &Engine) -> Result<Rule> {
        let rule = self.load()?;
        engine.verify(&rule)?;
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe, so these tests only read variables
    // that are known to be absent.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        assert_eq!(loader.load_var_or("NONEXISTENT_VAR_12345", "default"), "default");
    }

    #[test]
    fn test_env_loader_missing_var_names_full_key() {
        let loader = EnvLoader::new(Some("FORMKEEPER_TEST".to_string()));
        let err = loader.load_var("missing_var_67890").unwrap_err();
        assert!(matches!(err, LoadError::Env { ref key, .. } if key == "FORMKEEPER_TEST_MISSING_VAR_67890"));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 1 "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_config_defaults_when_unset() {
        let loader = EnvLoader::new(Some("FORMKEEPER_UNSET_54321".to_string()));
        assert_eq!(RuleSourceConfig::from_loader(&loader), RuleSourceConfig::default());
    }

    #[test]
    fn test_config_builder() {
        let config = RuleSourceConfig::new("/etc/forms").with_strict(true);
        assert_eq!(config.rules_dir, PathBuf::from("/etc/forms"));
        assert!(config.strict);
    }
}
