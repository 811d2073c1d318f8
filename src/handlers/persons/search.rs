use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::database::Person;
use crate::error::ApiError;
use crate::handlers::AppState;

/// First `query` value in the query string. Repeats are ignored.
fn first_query(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .find(|(key, _)| key == "query")
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// GET /api/v1/persons?query= - search by age (integer query) or text
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let Query(pairs) = params.map_err(|e| {
        tracing::debug!("Rejected search query string: {}", e);
        ApiError::bad_request("Search query cannot be empty.")
    })?;
    let query = first_query(pairs);
    if query.is_empty() {
        return Err(ApiError::bad_request("Search query cannot be empty."));
    }

    let persons = state.persons.search(&query).await.map_err(|e| {
        tracing::error!("Person search for '{}' failed: {}", query, e);
        ApiError::internal_server_error("Could not retrieve persons.")
    })?;

    if persons.is_empty() {
        return Err(ApiError::no_matches(format!(
            "Person for '{}' request was not found.",
            query
        )));
    }

    Ok(Json(persons))
}
