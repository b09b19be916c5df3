//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{authenticate_request, auth_middleware, require_owner, AuthGate, CurrentAccount};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};
