pub mod auth;
pub mod envelope;

pub use auth::{require_basic_auth, BasicAuthGate};
pub use envelope::{error_envelope, FaultKind, HandlerFault, Problem};
