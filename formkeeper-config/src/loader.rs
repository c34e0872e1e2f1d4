// Rule file loaders

use crate::{LoadError, Result};
use formkeeper_core::Rule;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Supported rule file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yml" | "yaml" => Some(FileFormat::Yaml),
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Rule file loader
pub struct RuleLoader {
    format: FileFormat,
}

impl RuleLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        FileFormat::from_path(path)
            .map(Self::new)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Load a rule from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Rule> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), format = ?self.format, "loading form rule");
        self.parse_named(&content, &path.display().to_string())
    }

    /// Parse a rule from a string
    pub fn parse(&self, content: &str) -> Result<Rule> {
        self.parse_named(content, "<string>")
    }

    fn parse_named(&self, content: &str, source_name: &str) -> Result<Rule> {
        let parsed = match self.format {
            FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| LoadError::Parse {
            source_name: source_name.to_string(),
            message,
        })
    }
}

/// Load and merge every rule file under `dir`.
///
/// Files are visited in path order, so a later file replaces templates and
/// forms of the same name from an earlier one. Files with an unknown
/// extension are skipped, or rejected when `strict` is set.
pub fn load_rule_from_dir(dir: impl AsRef<Path>, strict: bool) -> Result<Rule> {
    let mut rule = Rule::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        match FileFormat::from_path(path) {
            Some(format) => rule.merge(RuleLoader::new(format).load_file(path)?),
            None if strict => {
                return Err(LoadError::UnsupportedFormat(path.display().to_string()));
            }
            None => debug!(path = %path.display(), "skipping non-rule file"),
        }
    }

    Ok(rule)
}
