use crate::auth::AuthError;
use crate::store::StoreError;
use crate::types::inventory::IdsExhausted;

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub(crate) const INVALID_CREDENTIALS_TEXT: &str = "Credenciales inválidas";

/// Failures a request handler can surface. Unknown ids are not errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("invalid form: {0}")]
    InvalidForm(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(AuthError),
    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            other => AppError::Auth(other),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::InvalidForm(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidForm(message) => {
                tracing::warn!(%message, "rejected form");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_TEXT).into_response()
            }
            AppError::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
            AppError::Auth(err) => {
                tracing::error!(error = %err, "auth failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
            AppError::IdsExhausted(err) => {
                tracing::error!(error = %err, "cannot assign id");
                (StatusCode::CONFLICT, err.to_string()).into_response()
            }
            AppError::Task(err) => {
                tracing::error!(error = %err, "blocking task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

/// Errors raised while building the application.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to open data file: {0}")]
    Store(#[from] StoreError),
    #[error("invalid auth configuration: {0}")]
    Auth(#[from] AuthError),
}

/// Trims a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidForm(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
