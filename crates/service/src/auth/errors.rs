use models::errors::ModelError;
use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid credentials. User not found.")]
    UnknownEmail,
    #[error("Invalid credentials. Incorrect password.")]
    IncorrectPassword,
    #[error("A token is required for authentication")]
    TokenMissing,
    #[error("Invalid Token")]
    InvalidToken(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict(_) => 1002,
            AuthError::NotFound(_) => 1003,
            AuthError::UnknownEmail => 1004,
            AuthError::IncorrectPassword => 1005,
            AuthError::TokenMissing => 1006,
            AuthError::InvalidToken(_) => 1007,
            AuthError::Forbidden(_) => 1008,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<ModelError> for AuthError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(m) => AuthError::Validation(m),
            ModelError::Conflict(m) => AuthError::Conflict(m),
            ModelError::NotFound(m) => AuthError::NotFound(m),
            ModelError::Db(m) => AuthError::Repository(m),
        }
    }
}
