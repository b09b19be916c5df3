//! Session token codec.
//!
//! Tokens are HS256 JWTs carrying [`SessionClaims`] plus `iat`/`exp`.
//! The codec holds only immutable key material and is shared freely
//! between request tasks.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, JWT_LEEWAY_SECONDS};
use crate::domain::{Account, AccountRole};
use crate::errors::{AppError, AppResult};

/// Identity carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    #[serde(rename = "id")]
    pub account_id: Uuid,
    pub username: String,
    #[serde(rename = "type")]
    pub role: AccountRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
}

impl SessionClaims {
    pub fn for_account(account: &Account, business_id: Option<Uuid>) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
            role: account.role,
            business_id,
        }
    }
}

/// On-the-wire JWT payload
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    session: SessionClaims,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keys", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = JWT_LEEWAY_SECONDS;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            expiration_hours,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes(), config.jwt_expiration_hours)
    }

    /// Sign `claims` into a compact token.
    pub fn encode(&self, claims: &SessionClaims) -> AppResult<String> {
        let now = Utc::now();
        let payload = TokenClaims {
            session: claims.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiration_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| AppError::internal(format!("Token encoding failed: {}", e)))
    }

    /// Verify signature and expiry, returning the encoded claims.
    pub fn decode(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-unit-tests-0123456789";

    fn claims() -> SessionClaims {
        SessionClaims {
            account_id: Uuid::new_v4(),
            username: "alice".to_string(),
            role: AccountRole::Consumer,
            business_id: None,
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new(SECRET, 24);
        let original = claims();

        let token = codec.encode(&original).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), original);
    }

    #[test]
    fn test_round_trip_with_business() {
        let codec = TokenCodec::new(SECRET, 24);
        let original = SessionClaims {
            role: AccountRole::Business,
            business_id: Some(Uuid::new_v4()),
            ..claims()
        };

        let token = codec.encode(&original).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), original);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = TokenCodec::new(SECRET, 24);
        let token = codec.encode(&claims()).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        let idx = sig_start + 5;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(codec.decode(&tampered), Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = TokenCodec::new(SECRET, 24).encode(&claims()).unwrap();
        let other = TokenCodec::new(b"another-secret-key-for-unit-tests-98765", 24);

        assert!(matches!(other.decode(&token), Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(SECRET, -1);
        let token = codec.encode(&claims()).unwrap();

        assert!(matches!(codec.decode(&token), Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = TokenCodec::new(SECRET, 24);
        assert!(matches!(codec.decode("not.a.jwt"), Err(AppError::InvalidToken(_))));
        assert!(matches!(codec.decode(""), Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(claims()).unwrap();
        assert!(value.get("id").is_some());
        assert_eq!(value["type"], "consumer");
        assert!(value.get("business_id").is_none());
    }
}
