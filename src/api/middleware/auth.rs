//! Request authentication.
//!
//! The gate only establishes who is calling. Whether the caller may act
//! on a given resource is decided by each handler.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::api::session::{session_id, SessionStore};
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::AccountRole;
use crate::errors::{AppError, AppResult};
use crate::services::{SessionClaims, TokenCodec};

/// Authenticated account extracted from a token or session
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub username: String,
    pub role: AccountRole,
    pub business_id: Option<Uuid>,
}

impl From<SessionClaims> for CurrentAccount {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.account_id,
            username: claims.username,
            role: claims.role,
            business_id: claims.business_id,
        }
    }
}

impl CurrentAccount {
    pub fn claims(&self) -> SessionClaims {
        SessionClaims {
            account_id: self.id,
            username: self.username.clone(),
            role: self.role,
            business_id: self.business_id,
        }
    }
}

/// Token codec plus the optional cookie session store.
#[derive(Clone)]
pub struct AuthGate {
    pub codec: TokenCodec,
    pub sessions: Option<SessionStore>,
}

impl AuthGate {
    pub fn new(codec: TokenCodec, sessions: Option<SessionStore>) -> Self {
        Self { codec, sessions }
    }
}

/// Resolve an `Authorization` header value to session claims.
///
/// The header must carry the exact `Bearer ` prefix.
pub fn authenticate_request(header: Option<&str>, codec: &TokenCodec) -> AppResult<SessionClaims> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::MissingToken)?;

    codec.decode(token)
}

/// Authentication middleware.
///
/// Accepts a bearer token, or a session cookie when the request has no
/// Authorization header at all, and injects [`CurrentAccount`] into the
/// request extensions.
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match request.headers().get(AUTHORIZATION) {
        Some(value) => authenticate_request(value.to_str().ok(), &gate.codec)?,
        None => session_claims(&gate, &jar).await?,
    };

    request
        .extensions_mut()
        .insert(CurrentAccount::from(claims));

    Ok(next.run(request).await)
}

async fn session_claims(gate: &AuthGate, jar: &CookieJar) -> AppResult<SessionClaims> {
    let (Some(store), Some(id)) = (gate.sessions.as_ref(), session_id(jar)) else {
        return Err(AppError::MissingToken);
    };

    store.load(&id).await?.ok_or(AppError::MissingToken)
}

/// Require that the caller is the account being acted on.
pub fn require_owner(current: &CurrentAccount, account_id: Uuid) -> AppResult<()> {
    if current.id == account_id {
        Ok(())
    } else {
        tracing::warn!(caller = %current.id, target = %account_id, "Ownership check failed");
        Err(AppError::Forbidden)
    }
}
