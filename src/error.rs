// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::middleware::envelope::{FaultKind, HandlerFault};

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Most variants render a `{"message"}` body directly. `Public` and
/// `Private` are attached to the response as a [`HandlerFault`] and rendered
/// by the error envelope middleware instead.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),
    NoMatches(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // Envelope faults: client-caused (400) and internal (500)
    Public(String),
    Private(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::NoMatches(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::Public(_) => 400,
            ApiError::Private(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::NoMatches(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::Public(msg) => msg,
            ApiError::Private(msg) => msg,
        }
    }

    /// Body used when the error is rendered by the handler itself.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::NoMatches(msg) => json!({ "code": "not_found", "message": msg }),
            _ => json!({ "message": self.message() }),
        }
    }

    fn fault(&self) -> Option<HandlerFault> {
        match self {
            ApiError::Public(msg) => Some(HandlerFault::new(FaultKind::Public, msg.clone())),
            ApiError::Private(msg) => Some(HandlerFault::new(FaultKind::Private, msg.clone())),
            _ => None,
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn no_matches(message: impl Into<String>) -> Self {
        ApiError::NoMatches(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn public(message: impl Into<String>) -> Self {
        ApiError::Public(message.into())
    }

    pub fn private(message: impl Into<String>) -> Self {
        ApiError::Private(message.into())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.fault() {
            Some(fault) => {
                // The envelope replaces this body; the status stays in case it
                // is not installed.
                let mut response = status.into_response();
                response.extensions_mut().insert(fault);
                response
            }
            None => (status, Json(self.to_json())).into_response(),
        }
    }
}
