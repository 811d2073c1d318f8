use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{person, persons, system, AppState};
use crate::middleware::{error_envelope, require_basic_auth, BasicAuthGate};

/// Full application router. Every route, including the auth gate, runs
/// inside the error envelope.
pub fn app(state: AppState, gate: BasicAuthGate) -> Router {
    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/v1", api_routes(gate))
        .with_state(state)
        // Global middleware
        .layer(middleware::from_fn(error_envelope))
        .layer(TraceLayer::new_for_http())
}

/// [`app`] plus a permissive CORS layer.
pub fn app_with_cors(state: AppState, gate: BasicAuthGate) -> Router {
    app(state, gate).layer(CorsLayer::permissive())
}

fn api_routes(gate: BasicAuthGate) -> Router<AppState> {
    // Only the mutating methods are gated.
    let basic_auth = middleware::from_fn_with_state(gate, require_basic_auth);

    Router::new()
        .route(
            "/persons",
            get(persons::search).merge(post(persons::create).route_layer(basic_auth.clone())),
        )
        .route("/persons/list", get(persons::list))
        .route(
            "/person/:id",
            get(person::get).merge(
                put(person::update)
                    .delete(person::delete)
                    .route_layer(basic_auth),
            ),
        )
}
