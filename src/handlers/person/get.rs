use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::database::{Person, RepositoryError};
use crate::error::ApiError;
use crate::handlers::{person_id, AppState};

/// GET /api/v1/person/:id - fetch one person
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Person>, ApiError> {
    let id = person_id(path)?;

    match state.persons.get(id).await {
        Ok(person) => Ok(Json(person)),
        Err(RepositoryError::PersonNotFound) => Err(ApiError::not_found("Person not found.")),
        Err(e) => {
            tracing::error!("Fetching person {} failed: {}", id, e);
            Err(ApiError::internal_server_error("Could not fetch person."))
        }
    }
}
