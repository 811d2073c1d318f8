use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ApiError;

/// Credential table checked by [`require_basic_auth`]: username -> bcrypt hash.
#[derive(Clone, Debug, Default)]
pub struct BasicAuthGate {
    users: Arc<HashMap<String, String>>,
}

impl BasicAuthGate {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users: Arc::new(users) }
    }

    /// bcrypt re-derives the hash from the stored salt and compares in
    /// constant time. Unknown users and malformed hashes both fail.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(hash) => bcrypt::verify(password, hash).unwrap_or_else(|e| {
                tracing::error!("Stored hash for '{}' is unusable: {}", username, e);
                false
            }),
            None => false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    MissingHeader,
    BadScheme,
    BadCredentials,
}

impl Rejection {
    fn message(&self) -> &'static str {
        match self {
            Rejection::MissingHeader => "Authorization header is missing",
            Rejection::BadScheme => "Invalid authorization format",
            Rejection::BadCredentials => "Invalid username or password",
        }
    }
}

/// Rejects the request with 401 unless it carries valid Basic credentials.
/// The wrapped handler only runs on success.
pub async fn require_basic_auth(
    State(gate): State<BasicAuthGate>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let (username, password) = match extract_basic_credentials(&headers) {
        Ok(credentials) => credentials,
        Err(rejection) => return reject(rejection),
    };

    let user = username.clone();
    let verified = tokio::task::spawn_blocking(move || gate.verify(&username, &password))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Credential check did not complete: {}", e);
            false
        });

    if !verified {
        tracing::warn!("Rejected credentials for user '{}'", user);
        return reject(Rejection::BadCredentials);
    }

    tracing::debug!("Authorized user '{}'", user);
    next.run(request).await
}

fn reject(rejection: Rejection) -> Response {
    if rejection != Rejection::BadCredentials {
        tracing::warn!("Authorization failed: {}", rejection.message());
    }
    ApiError::unauthorized(rejection.message()).into_response()
}

fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), Rejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Rejection::MissingHeader)?;

    let value = value.to_str().map_err(|_| Rejection::BadScheme)?;
    if value.is_empty() {
        return Err(Rejection::MissingHeader);
    }

    let payload = value.strip_prefix("Basic ").ok_or(Rejection::BadScheme)?;
    Ok(decode_basic_payload(payload))
}

/// Undecodable or colon-less payloads yield empty credentials, which never
/// match a user.
fn decode_basic_payload(payload: &str) -> (String, String) {
    let decoded = match STANDARD.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => return (String::new(), String::new()),
    };
    match String::from_utf8(decoded) {
        Ok(text) => match text.split_once(':') {
            Some((user, pass)) => (user.to_string(), pass.to_string()),
            None => (String::new(), String::new()),
        },
        Err(_) => (String::new(), String::new()),
    }
}
