/// Error handling for the API server
///
/// Handlers return `ApiResult<T>`; every `ApiError` renders as
/// `{"error": "<message>"}` with the status below.
///
/// | Variant            | Status | Message                 |
/// |--------------------|--------|-------------------------|
/// | `ValidationFailed` | 400    | `validation failed`     |
/// | `Conflict`         | 400    | `user already exists`   |
/// | `Unauthorized`     | 401    | caller supplied         |
/// | `NotFound`         | 404    | caller supplied         |
/// | `InternalError`    | 500    | `internal server error` |
///
/// Validation failures deliberately carry no field-level detail.

use accounts_shared::{auth::password::PasswordError, repository::RepositoryError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const VALIDATION_FAILED: &str = "validation failed";
pub const USER_EXISTS: &str = "user already exists";
pub const PASSWORD_MISMATCH: &str = "password mismatch";
pub const USER_NOT_FOUND: &str = "user not found";
pub const INTERNAL_ERROR: &str = "internal server error";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Input does not satisfy the active schema (400)
    ValidationFailed,

    /// Email or phone already belongs to a user (400)
    Conflict,

    /// Bad credentials or token (401)
    Unauthorized(String),

    /// Target user does not exist (404)
    NotFound(String),

    /// Anything else (500); the detail is logged, never returned
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn user_not_found() -> Self {
        ApiError::NotFound(USER_NOT_FOUND.to_string())
    }

    pub fn password_mismatch() -> Self {
        ApiError::Unauthorized(PASSWORD_MISMATCH.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationFailed | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationFailed => write!(f, "{}", VALIDATION_FAILED),
            ApiError::Conflict => write!(f, "{}", USER_EXISTS),
            ApiError::Unauthorized(msg) => write!(f, "{}", msg),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Unique violations become `Conflict`; everything else is internal
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { constraint } => {
                tracing::warn!(constraint = %constraint, "Write rejected by unique constraint");
                ApiError::Conflict
            }
            RepositoryError::Database(err) => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}
