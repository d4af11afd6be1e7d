use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deadpool_sqlite::{HookError, InteractError};
use serde_json::json;
use shared::{api::error::ValidationError, model::StoreError};
use tracing::error;

/// Response-side error: a status code plus the message rendered into the
/// `{"error": ...}` body every failing endpoint returns
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(code: StatusCode, message: S) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unknown_user() -> Self {
        Self::new(StatusCode::NOT_FOUND, "unknown user id")
    }

    fn server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError {}: {}", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.error_messages.join(", "))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::unknown_user(),
            other => {
                error!("storage failure: {other}");
                Self::server_error()
            },
        }
    }
}

impl From<InteractError> for ApiError {
    fn from(err: InteractError) -> Self {
        error!("database interact failure: {err}");
        Self::server_error()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("internal failure: {err:?}");
        Self::server_error()
    }
}

// Lets pool hooks report connection configuration failures
impl From<ApiError> for HookError {
    fn from(err: ApiError) -> Self {
        Self::Message(err.to_string())
    }
}
