// src/error.rs

//! Unified error handling for the harvest pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV encoding/decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The listing source could not be reached
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A single detail page could not be fetched
    #[error("Fetch error for {context}: {message}")]
    Fetch { context: String, message: String },

    /// An expected field was absent or malformed
    #[error("Schema violation in '{field}': {reason}")]
    SchemaViolation { field: String, reason: String },

    /// A count pattern matched more than once
    #[error("Ambiguous count in '{field}': {matches} matches")]
    AmbiguousCount { field: String, matches: usize },

    /// Best-effort asset download failed
    #[error("Asset download failed for {key} ({url}): {message}")]
    AssetDownload {
        key: String,
        url: String,
        message: String,
    },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a discovery error.
    pub fn discovery(message: impl fmt::Display) -> Self {
        Self::Discovery(message.to_string())
    }

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a schema violation for a field.
    pub fn schema(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an asset download error.
    pub fn asset(
        key: impl Into<String>,
        url: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::AssetDownload {
            key: key.into(),
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error affects a single work item only.
    ///
    /// Item errors are recorded by the driver and the run continues.
    pub fn is_item_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. }
                | Self::Http(_)
                | Self::Url(_)
                | Self::SchemaViolation { .. }
                | Self::AmbiguousCount { .. }
                | Self::AssetDownload { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_wraps_message() {
        let err = AppError::discovery(AppError::fetch("listing", "timeout"));
        assert_eq!(
            err.to_string(),
            "Discovery error: Fetch error for listing: timeout"
        );
    }

    #[test]
    fn test_item_errors() {
        assert!(AppError::schema("year", "not a number").is_item_error());
        assert!(
            AppError::AmbiguousCount {
                field: "awards_won".into(),
                matches: 2
            }
            .is_item_error()
        );
        assert!(AppError::fetch("https://example.com", "timeout").is_item_error());
    }

    #[test]
    fn test_run_fatal_errors() {
        assert!(!AppError::discovery("listing unreachable").is_item_error());
        let io = std::io::Error::other("disk full");
        assert!(!AppError::from(io).is_item_error());
    }

    #[test]
    fn test_schema_message_names_field() {
        let err = AppError::schema("runtime", "empty");
        assert_eq!(err.to_string(), "Schema violation in 'runtime': empty");
    }
}
