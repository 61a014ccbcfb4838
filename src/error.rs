// src/error.rs

//! Unified error handling for the populator.

use std::fmt;

use thiserror::Error;

/// Result type alias for populator operations.
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

    /// Storage backend rejected a request
    #[error("Storage error during {operation} (status {status}): {body}")]
    Storage {
        operation: String,
        status: u16,
        body: String,
    },

    /// Enrichment page could not be used
    #[error("Enrichment error for {slug}: {message}")]
    Enrichment { slug: String, message: String },

    /// Image download or upload failed
    #[error("Image error for {url}: {message}")]
    Image { url: String, message: String },
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

    /// Create a storage error from a non-success backend response.
    pub fn storage(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create an enrichment error for a product slug.
    pub fn enrichment(slug: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Enrichment {
            slug: slug.into(),
            message: message.to_string(),
        }
    }

    /// Create an image error.
    pub fn image(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Image {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
