use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Type mismatch: {reason}")]
    TypeMismatch { reason: String },

    #[error("Missing shape: {what}")]
    MissingShape { what: String },

    #[error("Space has no patches to derive a bounding box from")]
    EmptySpace,

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("Unsupported distance unit: {unit}")]
    UnsupportedUnit { unit: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DomainError::MalformedInput { reason: reason.into() }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        DomainError::InvalidState { reason: reason.into() }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
