//! HTTP request handlers.

pub mod account_handler;
pub mod address_handler;
pub mod auth_handler;
pub mod contact_handler;

pub use account_handler::account_routes;
pub use address_handler::address_routes;
pub use auth_handler::{auth_routes, logout, session_routes};
pub use contact_handler::contact_routes;
