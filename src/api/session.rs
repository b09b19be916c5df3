//! Browser sessions.
//!
//! Cookie-based sessions for browser clients, kept beside the stateless
//! bearer tokens. The session id lives in the `sessionid` cookie and the
//! claims in Redis under `session:<id>`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SESSION_COOKIE_NAME;
use crate::errors::AppResult;
use crate::infra::Cache;
use crate::services::SessionClaims;

#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<Cache>,
    ttl_seconds: u64,
    secure: bool,
}

impl SessionStore {
    pub fn new(cache: Arc<Cache>, ttl_seconds: u64, secure: bool) -> Self {
        Self {
            cache,
            ttl_seconds,
            secure,
        }
    }

    /// Claims stored for a session id, if the session is still alive.
    pub async fn load(&self, session_id: &str) -> AppResult<Option<SessionClaims>> {
        self.cache.get_session(session_id).await
    }

    /// Open a session for `claims` and attach its cookie.
    ///
    /// A cache failure only costs the browser session; the caller still
    /// holds a valid token.
    pub async fn start(&self, jar: CookieJar, claims: &SessionClaims) -> CookieJar {
        let session_id = Uuid::new_v4().simple().to_string();

        match self
            .cache
            .set_session(&session_id, claims, self.ttl_seconds)
            .await
        {
            Ok(()) => jar.add(session_cookie(session_id, self.secure)),
            Err(e) => {
                tracing::warn!(account_id = %claims.account_id, "Could not open session: {}", e);
                jar
            }
        }
    }

    /// Drop the current session, if any, and clear its cookie.
    pub async fn end(&self, jar: CookieJar) -> CookieJar {
        if let Some(session_id) = session_id(&jar) {
            if let Err(e) = self.cache.delete_session(&session_id).await {
                tracing::warn!("Could not delete session: {}", e);
            }
        }
        jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    }
}

/// Session id carried by the request cookies.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
