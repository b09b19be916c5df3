//! Account repository - the credential store.
//!
//! Username and email lookups used for identity resolution are
//! case-insensitive; uniqueness itself is enforced by the database
//! (`LOWER(username)` / `LOWER(email)` unique indexes) and a violation on
//! write is reported as `AppError::DuplicateAccount`.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, AccountChanges, AccountRole, NewAccount};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Match `identifier` against username or email, ignoring case.
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Account>>;

    /// Exact (case-sensitive) email match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Email match ignoring case.
    async fn find_by_email_ignore_case(&self, email: &str) -> AppResult<Option<Account>>;

    async fn list_by_role(&self, role: AccountRole) -> AppResult<Vec<Account>>;

    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Replace editable fields of an existing account.
    async fn update(&self, id: Uuid, changes: AccountChanges) -> AppResult<Account>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account>;

    /// Update display names and, when given, the portrait path.
    async fn update_profile(
        &self,
        id: Uuid,
        first_name: String,
        last_name: String,
        portrait: Option<String>,
    ) -> AppResult<Account>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(
                Condition::any()
                    .add(lower_eq(account::Column::Username, identifier))
                    .add(lower_eq(account::Column::Email, identifier)),
            )
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email_ignore_case(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(lower_eq(account::Column::Email, email))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn list_by_role(&self, role: AccountRole) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .filter(account::Column::Role.eq(role.as_str()))
            .order_by_asc(account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        insert_account(&self.db, account).await
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> AppResult<Account> {
        let mut active = load_active(&self.db, id).await?;

        active.username = Set(changes.username);
        active.email = Set(changes.email);
        active.role = Set(changes.role.as_str().to_string());
        active.first_name = Set(changes.first_name);
        active.last_name = Set(changes.last_name);
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(Account::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account> {
        let mut active = load_active(&self.db, id).await?;
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Account::from(model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: String,
        last_name: String,
        portrait: Option<String>,
    ) -> AppResult<Account> {
        let mut active = load_active(&self.db, id).await?;
        active.first_name = Set(first_name);
        active.last_name = Set(last_name);
        if let Some(portrait) = portrait {
            active.portrait = Set(portrait);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Account::from(model))
    }
}

/// Insert an account on any connection (plain or transactional).
pub(crate) async fn insert_account<C: ConnectionTrait>(
    db: &C,
    account: NewAccount,
) -> AppResult<Account> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(account.username),
        email: Set(account.email),
        password_hash: Set(account.password_hash),
        role: Set(account.role.as_str().to_string()),
        first_name: Set(account.first_name),
        last_name: Set(account.last_name),
        portrait: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await.map_err(map_write_error)?;
    Ok(Account::from(model))
}

async fn load_active<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<ActiveModel> {
    let model = AccountEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::AccountNotFound)?;
    Ok(model.into())
}

/// `LOWER(column) = lower(value)`
fn lower_eq(column: account::Column, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase())
}

fn map_write_error(err: DbErr) -> AppError {
    let violation = err.sql_err();
    classify_write_error(violation, err)
}

fn classify_write_error(violation: Option<SqlErr>, err: DbErr) -> AppError {
    match violation {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Account uniqueness violated on write");
            AppError::DuplicateAccount
        }
        _ => AppError::Persistence(err),
    }
}
