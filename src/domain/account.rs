//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_BUSINESS, ROLE_CONSUMER};
use crate::errors::{AppError, AppResult};

/// Account roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Consumer,
    Business,
}

impl AccountRole {
    pub fn is_business(&self) -> bool {
        matches!(self, AccountRole::Business)
    }

    /// Parse a role supplied by a client. An absent role means consumer.
    pub fn parse(value: Option<&str>) -> AppResult<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(AccountRole::Consumer),
            Some(ROLE_CONSUMER) => Ok(AccountRole::Consumer),
            Some(ROLE_BUSINESS) => Ok(AccountRole::Business),
            Some(other) => Err(AppError::invalid_input(format!("Unknown account type '{}'", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Consumer => ROLE_CONSUMER,
            AccountRole::Business => ROLE_BUSINESS,
        }
    }
}

/// Lenient conversion for values already in the database.
impl From<&str> for AccountRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_BUSINESS => AccountRole::Business,
            _ => AccountRole::Consumer,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    /// Portrait path relative to the media root; empty when unset
    pub portrait: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_business(&self) -> bool {
        self.role.is_business()
    }

    /// Does `identifier` name this account (username or email, any case)?
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.username.eq_ignore_ascii_case(identifier) || self.email.eq_ignore_ascii_case(identifier)
    }

    /// Public view of this account, optionally tagged with its business.
    pub fn profile(&self, business_id: Option<Uuid>) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            portrait: self.portrait.clone(),
            business_id,
        }
    }
}

/// Data needed to insert an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
}

/// Full replacement of an account's editable fields
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    /// New password hash; `None` keeps the current one
    pub password_hash: Option<String>,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicProfile {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[serde(rename = "type")]
    #[schema(example = "consumer")]
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "portraits/550e8400-e29b-41d4-a716-446655440000.png")]
    pub portrait: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
}

/// Listing entry for accounts of one role
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}
