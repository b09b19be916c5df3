//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Every failure leaves the
//! boundary as the legacy envelope `{token: "", data: "", errors: [code]}`
//! plus a human readable message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Numeric error codes understood by existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    AccountExists = 1,
    DuplicateAccount = 2,
    SaveFailed = 3,
    AccountNotFound = 4,
    InvalidEmail = 5,
    InvalidInput = 6,
    Unauthorized = 7,
    Forbidden = 8,
    NotFound = 9,
}

impl ErrorCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid email address")]
    InvalidEmail,

    // Accounts
    #[error("An account with this username or email already exists")]
    DuplicateAccount,

    #[error("An account with this email already exists")]
    AccountExists,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Business account {0} has no linked business")]
    BusinessLinkMissing(Uuid),

    // Authentication & Authorization
    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Access denied")]
    Forbidden,

    // Other resources
    #[error("Resource not found")]
    NotFound,

    // External service errors
    #[error("Database error")]
    Persistence(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub token: &'static str,
    pub data: &'static str,
    pub errors: Vec<u8>,
    pub message: String,
}

impl AppError {
    /// Error code for client
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::InvalidEmail => ErrorCode::InvalidEmail,
            AppError::DuplicateAccount => ErrorCode::DuplicateAccount,
            AppError::AccountExists => ErrorCode::AccountExists,
            AppError::AccountNotFound | AppError::InvalidCredentials => {
                ErrorCode::AccountNotFound
            }
            AppError::MissingToken | AppError::InvalidToken(_) => ErrorCode::Unauthorized,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::BusinessLinkMissing(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                ErrorCode::SaveFailed
            }
        }
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidEmail => StatusCode::BAD_REQUEST,
            AppError::DuplicateAccount | AppError::AccountExists => StatusCode::CONFLICT,
            AppError::AccountNotFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::MissingToken | AppError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BusinessLinkMissing(_) | AppError::Persistence(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// User-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Persistence(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::InvalidToken(e) => {
                tracing::debug!("JWT error: {:?}", e);
                self.to_string()
            }
            // Already logged where it was detected
            AppError::BusinessLinkMissing(_) => "An internal error occurred".to_string(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Collapse "unknown account" into "bad credentials" so login
    /// responses never reveal which accounts exist.
    pub fn conceal_account_lookup(self) -> Self {
        match self {
            AppError::AccountNotFound => AppError::InvalidCredentials,
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            token: "",
            data: "",
            errors: vec![self.code().as_u8()],
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
    fn ok_or_account_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }

    fn ok_or_account_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::AccountNotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_share_code() {
        assert_eq!(AppError::AccountNotFound.code(), AppError::InvalidCredentials.code());
        assert_eq!(AppError::AccountNotFound.code().as_u8(), 4);
    }

    #[test]
    fn test_conceal_account_lookup() {
        let err = AppError::AccountNotFound.conceal_account_lookup();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = AppError::DuplicateAccount.conceal_account_lookup();
        assert!(matches!(err, AppError::DuplicateAccount));
    }

    #[test]
    fn test_business_link_missing_is_server_fault() {
        let err = AppError::BusinessLinkMissing(Uuid::new_v4());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(err.status(), AppError::InvalidCredentials.status());
    }

    #[test]
    fn test_legacy_codes() {
        assert_eq!(AppError::AccountExists.code().as_u8(), 1);
        assert_eq!(AppError::DuplicateAccount.code().as_u8(), 2);
        assert_eq!(AppError::internal("boom").code().as_u8(), 3);
        assert_eq!(AppError::InvalidEmail.code().as_u8(), 5);
    }
}
