//! Error types for Bankline

use thiserror::Error;

/// The main error type for Bankline operations
#[derive(Debug, Error)]
pub enum BanklineError {
    #[error("Index out of range: {index} (spline has {count} points)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Arc-length offset out of range: {0}")]
    OffsetOutOfRange(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Corrupt track file: {0}")]
    CorruptTrack(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Result type alias for Bankline operations
pub type Result<T> = std::result::Result<T, BanklineError>;

impl From<toml::de::Error> for BanklineError {
    fn from(err: toml::de::Error) -> Self {
        BanklineError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for BanklineError {
    fn from(err: toml::ser::Error) -> Self {
        BanklineError::TomlSerError(err.to_string())
    }
}
