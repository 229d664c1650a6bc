use thiserror::Error;

/// Unified error type for the resource protocol layer.
///
/// `Configuration` is a registration-time failure and surfaces at startup.
/// The cursor, sort and parameter variants are request-scoped client errors;
/// the entity variants are domain errors a repository propagates unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid resource configuration: {0}")]
    Configuration(String),

    #[error("invalid cursor: malformed token")]
    CursorInvalidToken,

    #[error("invalid cursor: expected {expected} values, got {got}")]
    CursorLengthMismatch { expected: usize, got: usize },

    #[error("unsupported sort field: {0}")]
    InvalidSortField(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid limit")]
    InvalidLimit,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{resource} not found: {id}")]
    EntityNotFound { resource: String, id: String },

    #[error("{resource} already exists: {id}")]
    EntityAlreadyExists { resource: String, id: String },

    #[error("repository error: {0}")]
    Repository(String),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::EntityNotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn already_exists(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::EntityAlreadyExists {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository(message.into())
    }
}
