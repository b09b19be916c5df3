//! Account service - lookups, listings and account edits.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::{Account, AccountChanges, AccountRole, AccountSummary, Password, PublicProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Full replacement of an account's editable fields
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// New password; empty or absent keeps the current one
    pub password: Option<String>,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(&self, id: Uuid) -> AppResult<PublicProfile>;

    /// Accounts with the given role; no role yields an empty list
    async fn list_by_role(&self, role: Option<&str>) -> AppResult<Vec<AccountSummary>>;

    /// Caller is responsible for checking ownership of `id`
    async fn update_account(&self, id: Uuid, update: AccountUpdate) -> AppResult<Account>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reject a username or email already held by another account.
    async fn ensure_available(&self, id: Uuid, value: &str) -> AppResult<()> {
        match self.uow.accounts().find_by_identifier(value).await? {
            Some(other) if other.id != id => Err(AppError::DuplicateAccount),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_account(&self, id: Uuid) -> AppResult<PublicProfile> {
        let account = self
            .uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or_account_not_found()?;

        let business_id = if account.is_business() {
            self.uow
                .businesses()
                .find_by_admin(account.id)
                .await?
                .map(|b| b.id)
        } else {
            None
        };

        Ok(account.profile(business_id))
    }

    async fn list_by_role(&self, role: Option<&str>) -> AppResult<Vec<AccountSummary>> {
        let role = match role.map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(Vec::new()),
        };

        // Unknown roles simply match nobody
        let Ok(role) = AccountRole::parse(Some(role)) else {
            return Ok(Vec::new());
        };

        let accounts = self.uow.accounts().list_by_role(role).await?;
        Ok(accounts.into_iter().map(AccountSummary::from).collect())
    }

    async fn update_account(&self, id: Uuid, update: AccountUpdate) -> AppResult<Account> {
        let username = update.username.trim();
        let email = update.email.trim();

        if username.is_empty() || email.is_empty() {
            return Err(AppError::invalid_input("Username and email are required"));
        }
        if !email.validate_email() {
            return Err(AppError::InvalidEmail);
        }

        let current = self
            .uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or_account_not_found()?;

        // A business account is tied to its business row, so the role is fixed
        if let Some(requested) = update.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            if AccountRole::parse(Some(requested))? != current.role {
                return Err(AppError::invalid_input("Account type cannot be changed"));
            }
        }

        self.ensure_available(id, username).await?;
        self.ensure_available(id, email).await?;

        let password_hash = match update.password.as_deref() {
            Some(p) if !p.is_empty() => Some(Password::new(p)?.into_string()),
            _ => None,
        };

        let account = self
            .uow
            .accounts()
            .update(
                id,
                AccountChanges {
                    username: username.to_string(),
                    email: email.to_string(),
                    role: current.role,
                    first_name: update.first_name,
                    last_name: update.last_name,
                    password_hash,
                },
            )
            .await?;

        tracing::info!(account_id = %account.id, "Account updated");
        Ok(account)
    }
}
