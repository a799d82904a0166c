//! Error types for seriatim

use thiserror::Error;

/// Result type alias using the crate-wide [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for everything the library does
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<ImportError> for Error {
    fn from(value: ImportError) -> Self {
        match value {
            ImportError::Parse(e) => Error::Parse(e),
            ImportError::Persistence(e) => Error::Persistence(e),
        }
    }
}

/// Errors raised while decoding a transfer document. None of these ever leave a mutated store
/// behind, decoding finishes before anything is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing key `{0}`")]
    MissingKey(String),

    #[error("type mismatch at `{path}`, expected {expected}")]
    TypeMismatch { path: String, expected: String },

    #[error("malformed date at `{path}`: {raw:?}")]
    MalformedDate { path: String, raw: String },

    #[error("document is corrupted: {0}")]
    DataCorrupted(String),
}

/// A store write, read or commit failed.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct PersistenceError {
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl PersistenceError {
    pub fn new(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

impl From<sqlx::Error> for PersistenceError {
    fn from(value: sqlx::Error) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid catalog url: {0}")]
    BadUrl(String),

    #[error("catalog responded with status {0}")]
    BadResponse(u16),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A required field was missing or malformed when building an entity by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a full-replace import.
///
/// [ImportError::Parse] is always recoverable, the library was not touched. With
/// [ImportError::Persistence] the outcome depends on the store: a transactional store discards
/// the whole import, others may be left partially or fully empty.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not decode document: {0}")]
    Parse(#[from] ParseError),

    #[error("could not write library: {0}")]
    Persistence(#[from] PersistenceError),
}
