// Error types for rule loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse form-rule {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Failed to walk rule directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Environment variable error for {key}: {source}")]
    Env {
        key: String,
        #[source]
        source: std::env::VarError,
    },

    #[error("Failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("Rule check failed: {0}")]
    Verify(#[from] formkeeper_core::FormError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
