/// Middleware module
///
/// Bearer-token authentication for protected routes.

mod auth_gate;

pub use auth_gate::resolve_identity;
pub use auth_gate::AuthGate;
