// handlers/mod.rs - Person directory endpoints
//
// Read routes are public. Create, update and delete sit behind the Basic
// auth gate (see routes.rs).
pub mod person;
pub mod persons;
pub mod system;

use std::sync::Arc;

use axum::extract::{rejection::PathRejection, Path};

use crate::database::{PersonId, PersonRepository};
use crate::error::ApiError;

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub persons: Arc<dyn PersonRepository>,
}

impl AppState {
    pub fn new(persons: Arc<dyn PersonRepository>) -> Self {
        Self { persons }
    }
}

/// Path ids are unsigned in the API and must fit the store's BIGINT key.
pub(crate) fn parse_person_id(raw: &str) -> Result<PersonId, ApiError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| PersonId::try_from(id).ok())
        .ok_or_else(|| ApiError::bad_request("Could not parse person id."))
}

/// `:id` segment of a person route. Undecodable segments get the same 400 as
/// non-numeric ones.
pub(crate) fn person_id(path: Result<Path<String>, PathRejection>) -> Result<PersonId, ApiError> {
    match path {
        Ok(Path(raw)) => parse_person_id(&raw),
        Err(e) => {
            tracing::debug!("Rejected person id segment: {}", e);
            Err(ApiError::bad_request("Could not parse person id."))
        }
    }
}
