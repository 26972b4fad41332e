use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::ScheduleError;
use crate::models::ErrorResponse;
use crate::services::{AuthError, PostgresError};

/// Errors returned by request handlers, rendered as `ErrorResponse` JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInterval(String),

    #[error("Time slot already booked")]
    SlotUnavailable,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn credentials() -> Self {
        ApiError::Unauthorized("Could not validate credentials".to_string())
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::InvalidInterval(_) => "invalid_interval",
            ApiError::SlotUnavailable => "slot_unavailable",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::Validation(_)
            | ApiError::InvalidInterval(_)
            | ApiError::SlotUnavailable => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut response = HttpResponse::build(status);

        if status == StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        response.json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            PostgresError::Duplicate(what) => ApiError::BadRequest(format!("Already exists: {}", what)),
            PostgresError::InvalidInput(e) => e.into(),
            PostgresError::SlotUnavailable(_) => ApiError::SlotUnavailable,
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidInterval { .. } => ApiError::InvalidInterval(err.to_string()),
            ScheduleError::CorruptBooking { .. } => {
                tracing::error!("{}", err);
                ApiError::Internal("Stored schedule is inconsistent".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                ApiError::credentials()
            }
            AuthError::Hash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::Internal("Password processing failed".to_string())
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        tracing::error!("Blocking task failed: {}", err);
        ApiError::Internal("Worker pool unavailable".to_string())
    }
}
