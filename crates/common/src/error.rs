//! Error types for fortiform

use thiserror::Error;

use crate::types::Diagnostic;

/// Result type alias using fortiform Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lifecycle operation names used in error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "creating"),
            Operation::Read => write!(f, "reading"),
            Operation::Update => write!(f, "updating"),
            Operation::Delete => write!(f, "deleting"),
        }
    }
}

/// fortiform error types
#[derive(Error, Debug)]
pub enum Error {
    /// Building the request object from local state failed
    #[error("Error building {field}: {reason}")]
    Expand { field: String, reason: String },

    /// The management API call failed
    #[error("Error {operation} {resource} resource: {source}")]
    Api {
        resource: String,
        operation: Operation,
        #[source]
        source: ClientError,
    },

    /// A value returned by the API could not be written into local state
    #[error("Error reading {field}: {reason}")]
    StateWrite { field: String, reason: String },

    /// Building the request body for a resource failed
    #[error("Error {operation} {resource} resource while getting object: {source}")]
    Object {
        resource: String,
        operation: Operation,
        #[source]
        source: Box<Error>,
    },

    /// An API response could not be mapped into a resource's state
    #[error("Error reading {resource} resource from API: {source}")]
    Refresh {
        resource: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid configuration for {resource}: {}", summarize(.diagnostics))]
    Validation {
        resource: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    #[error("Invalid provider configuration: {0}")]
    Config(String),

    #[error("State encoding error: {0}")]
    Encoding(String),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures reported by a management API client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unauthorized")]
    Unauthorized,
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}
