use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::{json, Value};

use crate::database::{PersonUpdate, RepositoryError};
use crate::error::ApiError;
use crate::handlers::{person_id, AppState};
use crate::validation::{validate_email, validate_phone, within_field_limit};

/// PUT /api/v1/person/:id - partial update
///
/// Only the fields present in the body change. Empty strings are rejected
/// and a non-positive age counts as absent, so neither "clear this field"
/// nor age 0 can be expressed.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<PersonUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = person_id(path)?;
    let Json(changes) = payload.map_err(|e| {
        tracing::debug!("Rejected update body for {}: {}", id, e);
        ApiError::bad_request("Could not parse request data.")
    })?;

    if let Some(email) = changes.email.as_deref().filter(|e| !e.is_empty()) {
        match state.persons.find_by_email(email, id).await {
            Ok(_) => return Err(ApiError::conflict("Email already in use.")),
            Err(RepositoryError::PersonNotFound) => {}
            Err(e) => {
                return Err(ApiError::private(format!("email lookup for {} failed: {}", id, e)));
            }
        }
        if !validate_email(email) {
            return Err(ApiError::bad_request("Invalid email format."));
        }
    }

    if !changes.has_changes() {
        return Err(ApiError::bad_request("At least one field must be provided for update."));
    }

    if let Some(field) = changes.first_empty_field() {
        return Err(ApiError::bad_request(format!("{} cannot be empty.", field)));
    }

    if let Some(phone) = changes.telephone.as_deref() {
        if !validate_phone(phone) {
            return Err(ApiError::bad_request("Invalid phone number format."));
        }
    }

    let limited = [
        ("Name", &changes.name),
        ("Surname", &changes.surname),
        ("Email", &changes.email),
    ];
    for (label, value) in limited {
        if value.as_deref().is_some_and(|v| !within_field_limit(v)) {
            return Err(ApiError::bad_request(format!("{} exceeds 200 characters.", label)));
        }
    }

    let person = changes.into_person(id);
    match state.persons.update(&person).await {
        Ok(()) => {
            tracing::info!("Updated person {}", id);
            Ok(Json(json!({ "message": "Person updated successfully!" })))
        }
        Err(RepositoryError::PersonNotFound) => Err(ApiError::not_found("Person not found.")),
        Err(RepositoryError::EmailExists) => Err(ApiError::conflict("Email already in use.")),
        Err(e) => {
            tracing::error!("Updating person {} failed: {}", id, e);
            Err(ApiError::internal_server_error("Could not update person."))
        }
    }
}
