//! Account API - authentication and account management over HTTP.
//!
//! Signup and login issue signed session tokens, businesses register
//! together with their administrator account, and authenticated callers
//! manage their profile, portrait and addresses.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Accounts, businesses, addresses, passwords
//! - **services**: Token codec and account use cases
//! - **infra**: Database, Redis, mail and media storage
//! - **api**: HTTP handlers, middleware, sessions and routes
//! - **types**: Response envelopes
//! - **errors**: Error codes and the failure envelope
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, AccountRole, Password};
pub use errors::{AppError, AppResult, ErrorCode};
pub use infra::Cache;
pub use services::{SessionClaims, TokenCodec};
