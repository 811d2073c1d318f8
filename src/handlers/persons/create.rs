use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::database::{Person, RepositoryError};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::validation::check_new_person;

/// POST /api/v1/persons - create a person, returns the assigned id
///
/// Format violations are reported through the error envelope; a taken email
/// is a 409.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Person>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(mut person) = payload.map_err(|e| {
        tracing::debug!("Rejected create body: {}", e);
        ApiError::bad_request("Could not parse request data.")
    })?;
    person.id = 0;

    check_new_person(&person).map_err(ApiError::public)?;

    match state.persons.create(&person).await {
        Ok(id) => {
            tracing::info!("Created person {} ({})", id, person.email);
            Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
        }
        Err(RepositoryError::EmailExists) => Err(ApiError::conflict("Email already in use.")),
        Err(e) => {
            tracing::error!("Creating person {} failed: {}", person.email, e);
            Err(ApiError::internal_server_error("Could not create person."))
        }
    }
}
