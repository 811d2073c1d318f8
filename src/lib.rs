pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod validation;

pub use handlers::AppState;
pub use middleware::BasicAuthGate;
pub use routes::{app, app_with_cors};
