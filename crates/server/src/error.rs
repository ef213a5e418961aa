//! Unified error handling.
//!
//! All route handlers return `Result<T, AppError>`. The `IntoResponse`
//! impl maps every variant to an HTTP status and a `{ "error": message }`
//! JSON body, hiding internal detail from clients while logging it.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::settlement::SettlementError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No active session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Cart total exceeds balance.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Neither report document could be persisted.
    #[error("Documents not saved")]
    DocumentsNotSaved,

    /// Documents were stored but the balance credit failed.
    #[error("Credit failed: {0}")]
    CreditFailed(#[source] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::DocumentsNotSaved => Self::DocumentsNotSaved,
            SettlementError::Credit(e) => Self::CreditFailed(e),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(msg) => Self::Validation(msg.to_owned()),
            CheckoutError::InsufficientFunds => Self::InsufficientFunds,
            CheckoutError::Store(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) | Self::CreditFailed(_)
        ) {
            tracing::error!(error = %self, "request failed");
        }

        let status = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) | Self::CreditFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Invalid(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::InsufficientFunds => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::DocumentsNotSaved => StatusCode::BAD_GATEWAY,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::CreditFailed(_) => "Documents were stored but the credit failed".to_string(),
            Self::DocumentsNotSaved => "Failed to store the generated documents".to_string(),
            Self::InsufficientFunds => "Insufficient funds".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid username or password".to_string(),
                AuthError::UserAlreadyExists => "Username already taken".to_string(),
                AuthError::Invalid(msg) => msg.clone(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::Validation(msg) => msg.clone(),
            Self::Unauthorized(msg) => msg.clone(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized("no session".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::InsufficientFunds), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::DocumentsNotSaved), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_credit_failure_is_distinct_from_documents_not_saved() {
        let credit = AppError::from(crate::services::settlement::SettlementError::Credit(
            RepositoryError::NotFound,
        ));
        let not_saved =
            AppError::from(crate::services::settlement::SettlementError::DocumentsNotSaved);

        assert_ne!(
            credit.into_response().status(),
            not_saved.into_response().status()
        );
    }
}
