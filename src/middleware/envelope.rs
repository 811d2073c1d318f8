use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};

const INTERNAL_DETAIL: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Caused by the client's input; the detail is shown as-is.
    Public,
    /// Internal; the detail is logged, never shown.
    Private,
}

/// Error a handler attaches to its response for the envelope to render.
#[derive(Debug, Clone)]
pub struct HandlerFault {
    pub kind: FaultKind,
    pub detail: String,
}

impl HandlerFault {
    pub fn new(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }
}

/// Problem body shared by every envelope response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

impl Problem {
    pub fn new(status: StatusCode, detail: impl Into<String>, instance: impl Into<String>) -> Self {
        let title = status.canonical_reason().unwrap_or("Error").to_string();
        Self {
            kind: format!("/errors/{}", title.to_lowercase().replace(' ', "-")),
            title,
            status: status.as_u16(),
            detail: detail.into(),
            instance: instance.into(),
        }
    }

    pub fn internal(instance: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL, instance)
    }

    pub fn from_fault(fault: &HandlerFault, instance: impl Into<String>) -> Self {
        match fault.kind {
            FaultKind::Public => Self::new(StatusCode::BAD_REQUEST, fault.detail.clone(), instance),
            FaultKind::Private => Self::internal(instance),
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Outermost request boundary: a panicking handler becomes a 500 problem,
/// and a fault attached by the handler is rendered as a problem response.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let instance = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            tracing::error!("Handler panicked on {}: {}", instance, panic_message(panic.as_ref()));
            return Problem::internal(instance).into_response();
        }
    };

    match response.extensions_mut().remove::<HandlerFault>() {
        Some(fault) => {
            if fault.kind == FaultKind::Private {
                tracing::error!("Internal fault on {}: {}", instance, fault.detail);
            }
            Problem::from_fault(&fault, instance).into_response()
        }
        None => response,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
