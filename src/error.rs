//! Error types for the exporter
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! The export engine itself retries provider failures forever, so most of
//! these variants only ever surface through logs or at startup.

use thiserror::Error;

/// The main error type for the exporter
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Provider Errors
    // ============================================================================
    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Invalid continuation token: {message}")]
    Continuation { message: String },

    #[error("Failed to load deposit wallets: {message}")]
    Wallets { message: String },

    // ============================================================================
    // Report Errors
    // ============================================================================
    #[error("Report error: {message}")]
    Report { message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ============================================================================
    // I/O and Lifecycle
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export cancelled")]
    Cancelled,

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a continuation token error
    pub fn continuation(message: impl Into<String>) -> Self {
        Self::Continuation {
            message: message.into(),
        }
    }

    /// Create a wallets error
    pub fn wallets(message: impl Into<String>) -> Self {
        Self::Wallets {
            message: message.into(),
        }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Check if this error aborts the export instead of being retried.
    ///
    /// The engine retries every provider failure forever; the only error
    /// that breaks the retry loop is an explicit cancellation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for the exporter
pub type Result<T> = std::result::Result<T, Error>;
