//! Rule file loading for formkeeper
//!
//! Form rules can live in YAML, TOML or JSON files. A rules directory is
//! walked in file name order and every file is merged into one [`Rule`].
//!
//! ```no_run
//! use formkeeper_config::RuleSourceConfig;
//! use formkeeper_core::Engine;
//!
//! let engine = Engine::new();
//! let rule = RuleSourceConfig::from_env().load_verified(&engine)?;
//! # Ok::<(), formkeeper_config::LoadError>(())
//! ```
//!
//! [`Rule`]: formkeeper_core::Rule

pub mod env;
pub mod error;
pub mod loader;

pub use env::{ENV_PREFIX, EnvLoader, RuleSourceConfig};
pub use error::{LoadError, Result};
pub use loader::{FileFormat, RuleLoader, load_rule_from_dir};
