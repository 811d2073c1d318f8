use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::{Person, RepositoryError};
use crate::error::ApiError;
use crate::handlers::{person_id, AppState};

/// DELETE /api/v1/person/:id - hard delete
///
/// The repository does not report missing rows on delete, so existence is
/// checked first.
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = person_id(path)?;

    let person: Person = match state.persons.get(id).await {
        Ok(person) => person,
        Err(RepositoryError::PersonNotFound) => {
            return Err(ApiError::not_found("Person not found."));
        }
        Err(e) => {
            tracing::error!("Fetching person {} before delete failed: {}", id, e);
            return Err(ApiError::internal_server_error("Could not fetch the person."));
        }
    };

    state.persons.delete(&person).await.map_err(|e| {
        tracing::error!("Deleting person {} failed: {}", id, e);
        ApiError::internal_server_error("Could Not Delete Person")
    })?;

    tracing::info!("Deleted person {}", id);
    Ok(Json(json!({ "message": "Deleted Successfully" })))
}
