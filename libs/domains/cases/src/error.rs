use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Case not found: {0}")]
    CaseNotFound(Uuid),

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),
}

pub type CaseResult<T> = Result<T, CaseError>;

impl From<mongodb::error::Error> for CaseError {
    fn from(err: mongodb::error::Error) -> Self {
        CaseError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CaseError {
    fn from(err: validator::ValidationErrors) -> Self {
        CaseError::Validation(err.to_string())
    }
}
