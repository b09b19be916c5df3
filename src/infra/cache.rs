//! Redis-backed session and rate limit storage.
//!
//! Sessions are JSON documents under `session:<id>` with a TTL; rate
//! limit counters live under `rate_limit:<scope>:<client>` and expire
//! with their window.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT, CACHE_PREFIX_SESSION};
use crate::errors::{AppError, AppResult};

/// Shared Redis connection. Cloning is cheap; the manager reconnects on its own.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Round trip to the server for health checks.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub async fn set_session<T: Serialize>(
        &self,
        session_id: &str,
        data: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(data)
            .map_err(|e| AppError::internal(format!("Session serialization error: {}", e)))?;

        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(session_key(session_id), json, ttl_seconds)
            .await
            .map_err(cache_error)
    }

    /// Session data, or `None` when missing, expired or unreadable.
    pub async fn get_session<T: DeserializeOwned>(&self, session_id: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(cache_error)?;

        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(session_id, "Discarding unreadable session: {}", e);
                None
            }
        }))
    }

    pub async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(session_key(session_id))
            .await
            .map_err(cache_error)
    }

    // =========================================================================
    // Rate Limiting
    // =========================================================================

    /// Count one request for `identifier` in its fixed window.
    /// Returns (current_count, is_allowed).
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            // First request opens the window
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", CACHE_PREFIX_SESSION, session_id)
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
