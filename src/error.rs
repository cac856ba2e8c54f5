//! Structured error types for config store operations.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // File errors
    ConfigNotSupported,
    ConfigFileNotFound,
    ConfigFileInvalid,

    // Alias errors
    CircularReference,

    // Programming errors
    TypeMismatch,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::ConfigNotSupported => write!(f, "config not supported"),
            ErrorCode::ConfigFileNotFound => write!(f, "config file not found"),
            ErrorCode::ConfigFileInvalid => write!(f, "config file invalid"),
            ErrorCode::CircularReference => write!(f, "circular reference"),
            ErrorCode::TypeMismatch => write!(f, "type mismatch"),
        }
    }
}

/// Structured error raised by the store, its loaders and file discovery.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
            path: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_string_lossy().to_string());
        self
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    // Convenience constructors

    pub fn not_supported(ext: &str, supported: &[&str]) -> Self {
        Self::new(
            ErrorCode::ConfigNotSupported,
            format!(
                "Unsupported config type '{}', supported extensions are {}",
                ext,
                supported.join(", ")
            ),
        )
    }

    pub fn file_not_found(search_paths: &[impl AsRef<Path>]) -> Self {
        let paths: Vec<String> = search_paths
            .iter()
            .map(|p| p.as_ref().display().to_string())
            .collect();
        Self::new(
            ErrorCode::ConfigFileNotFound,
            format!("Couldn't find config on paths: [{}]", paths.join(", ")),
        )
    }

    pub fn empty_file(path: &Path) -> Self {
        Self::new(
            ErrorCode::ConfigFileNotFound,
            format!("Config file {} yielded no values", path.display()),
        )
        .with_path(path)
    }

    pub fn invalid_file(path: &Path, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConfigFileInvalid,
            format!("Failed to load config {}: {}", path.display(), reason),
        )
        .with_path(path)
    }

    pub fn invalid_content(format: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConfigFileInvalid,
            format!("Failed to parse {} config: {}", format, reason),
        )
    }

    pub fn circular_reference(alias: &str, key: &str) -> Self {
        Self::new(
            ErrorCode::CircularReference,
            format!("Aliasing {} -> {} would create a circular reference", alias, key),
        )
        .with_key(alias)
    }

    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Self::new(
            ErrorCode::TypeMismatch,
            format!("Expected {}, found {}", expected, found),
        )
    }
}

/// Result type for config store operations.
pub type Result<T> = std::result::Result<T, Error>;
