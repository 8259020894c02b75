use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("No user with email '{0}'")]
    EmailNotFound(String),

    #[error("No lawyer registered under OAB {number}/{state}")]
    OabNotFound { number: String, state: String },

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("OAB {number}/{state} already registered")]
    DuplicateOab { number: String, state: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// True for the "no such record" family, as opposed to lookup failures
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            UserError::NotFound(_) | UserError::EmailNotFound(_) | UserError::OabNotFound { .. }
        )
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            err if err.is_not_found() => AppError::NotFound(err.to_string()),
            UserError::DuplicateEmail(_) | UserError::DuplicateOab { .. } => {
                AppError::Conflict(err.to_string())
            }
            UserError::Validation(msg) => AppError::InvalidInput(msg),
            // Same message for unknown email and wrong password
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::AccountInactive => AppError::Unauthorized(err.to_string()),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::Timeout(msg) => AppError::DatabaseTimeout(msg),
            // PasswordHash and Internal
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
