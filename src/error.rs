//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Name of the partial unique index guarding one active reservation per game
pub const ACTIVE_RESERVATION_INDEX: &str = "reservations_one_active_per_game";

/// Stable error codes returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    StoreFailure = 3,
    NoSuchGame = 5,
    GameNotAvailable = 7,
    BadValue = 18,
    NotificationFailure = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing input; never reaches a mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A state precondition was violated, e.g. the game is not available
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store call failed; the caller may retry
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Best-effort delivery failure; logged, never surfaced by the booking flow
    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation()
                && db_err.constraint() == Some(ACTIVE_RESERVATION_INDEX)
            {
                return AppError::Conflict("This game already has an active reservation".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Conflict(
                    "The record is still referenced by reservations".to_string(),
                );
            }
        }
        AppError::Persistence(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchGame, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorCode::GameNotAvailable,
                format!("Someone already booked this game: {}", msg),
            ),
            AppError::Persistence(msg) => {
                tracing::error!("Persistence error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::StoreFailure,
                    "The library could not save your request, please retry".to_string(),
                )
            }
            AppError::Notification(msg) => {
                tracing::warn!("Notification error reached a handler: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::NotificationFailure,
                    "Notification delivery failed".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
