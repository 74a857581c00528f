//! Error types for the synthgen generation framework.

use std::path::PathBuf;
use thiserror::Error;

/// Tool registration and lookup errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Tool registration requires a non-empty scenario name")]
    MissingIdentifier,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Configuration rejected by a tool or by the run request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", render_validation(.field, .message, .accepted))]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    /// Accepted values when the field is an enumeration
    pub accepted: Vec<String>,
}

fn render_validation(field: &str, message: &str, accepted: &[String]) -> String {
    if accepted.is_empty() {
        format!("Invalid value for '{}': {}", field, message)
    } else {
        format!(
            "Invalid value for '{}': {} (accepted: {})",
            field,
            message,
            accepted.join(", ")
        )
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            accepted: Vec::new(),
        }
    }

    /// Error for an enumerated field whose value has no safe default
    pub fn not_in_set<S: AsRef<str>>(field: impl Into<String>, value: &str, accepted: &[S]) -> Self {
        Self {
            field: field.into(),
            message: format!("unrecognized value '{}'", value),
            accepted: accepted.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Text generation backend errors
#[derive(Debug, Error, Clone)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(String),

    #[error("Backend rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Backend authentication failed: {0}")]
    AuthFailed(String),

    #[error("Backend model not found: {0}")]
    ModelNotFound(String),

    #[error("Backend returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Backend client error: {0}")]
    Client(String),
}

impl BackendError {
    /// Transient failures that a bounded retry may recover from
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::Request(_) | BackendError::RateLimited(_))
    }
}

/// Artifact persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact: {0}")]
    Serialize(String),

    #[error("Persistence task aborted: {0}")]
    Aborted(String),
}

/// Top-level errors surfaced to the CLI layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
