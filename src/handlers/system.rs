use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::handlers::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Person Directory",
        "version": version,
        "endpoints": {
            "search": "GET /api/v1/persons?query= (public)",
            "list": "GET /api/v1/persons/list (public)",
            "get": "GET /api/v1/person/:id (public)",
            "create": "POST /api/v1/persons (basic auth)",
            "update": "PUT /api/v1/person/:id (basic auth)",
            "delete": "DELETE /api/v1/person/:id (basic auth)",
            "health": "GET /health (public)",
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.persons.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
