//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use super::middleware::AuthGate;
use super::session::SessionStore;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{build_mailer, Cache, Database, Persistence};
use crate::services::{ServiceContainer, Services, TokenCodec};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Token codec and session store used by the auth middleware
    pub gate: AuthGate,
    /// Redis cache; `None` disables rate limiting and cookie sessions
    pub cache: Option<Arc<Cache>>,
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire the production state over a connected database and cache.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        config: &Config,
    ) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let mailer = build_mailer(&config.smtp)
            .map_err(|e| AppError::internal(format!("SMTP setup failed: {}", e)))?;
        let services = Arc::new(Services::build(uow, config, mailer));

        let sessions = SessionStore::new(
            cache.clone(),
            config.session_ttl_seconds,
            config.session_cookie_secure,
        );

        Ok(Self {
            services,
            gate: AuthGate::new(TokenCodec::from_config(config), Some(sessions)),
            cache: Some(cache),
            database: Some(database),
        })
    }

    /// State with injected services and no external infrastructure.
    pub fn new(services: Arc<dyn ServiceContainer>, codec: TokenCodec) -> Self {
        Self {
            services,
            gate: AuthGate::new(codec, None),
            cache: None,
            database: None,
        }
    }

    pub fn sessions(&self) -> Option<&SessionStore> {
        self.gate.sessions.as_ref()
    }
}
