use axum::{extract::State, Json};

use crate::database::Person;
use crate::error::ApiError;
use crate::handlers::AppState;

/// GET /api/v1/persons/list - every stored person
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Person>>, ApiError> {
    let persons = state.persons.get_all().await.map_err(|e| {
        tracing::error!("Listing persons failed: {}", e);
        ApiError::internal_server_error("Could not fetch persons. Try again later.")
    })?;
    Ok(Json(persons))
}
