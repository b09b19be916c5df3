//! Unit of Work pattern implementation.
//!
//! Centralizes access to the account, business and address stores and
//! runs multi-record writes (business registration) inside one database
//! transaction that is committed on success and rolled back on error.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    insert_account, insert_address, insert_business, AccountRepository, AccountStore,
    AddressRepository, AddressStore, BusinessRepository, BusinessStore,
};
use crate::domain::{Account, Address, AddressFields, Business, NewAccount, NewBusiness};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transactional closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method;
/// tests implement it by hand around mocked or in-memory repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn businesses(&self) -> Arc<dyn BusinessRepository>;

    fn addresses(&self) -> Arc<dyn AddressRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Writes that can take part in a transaction.
#[async_trait]
pub trait TransactionalWrites: Send + Sync {
    async fn create_account(&self, account: NewAccount) -> AppResult<Account>;

    async fn create_address(&self, fields: AddressFields) -> AppResult<Address>;

    async fn create_business(&self, business: NewBusiness) -> AppResult<Business>;
}

#[async_trait]
impl TransactionalWrites for DatabaseTransaction {
    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        insert_account(self, account).await
    }

    async fn create_address(&self, fields: AddressFields) -> AppResult<Address> {
        insert_address(self, fields).await
    }

    async fn create_business(&self, business: NewBusiness) -> AppResult<Business> {
        insert_business(self, business).await
    }
}

/// Write access to the stores inside a running transaction.
pub struct TransactionContext<'a> {
    writes: &'a dyn TransactionalWrites,
}

impl<'a> TransactionContext<'a> {
    pub fn new(writes: &'a dyn TransactionalWrites) -> Self {
        Self { writes }
    }

    pub async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        self.writes.create_account(account).await
    }

    pub async fn create_address(&self, fields: AddressFields) -> AppResult<Address> {
        self.writes.create_address(fields).await
    }

    pub async fn create_business(&self, business: NewBusiness) -> AppResult<Business> {
        self.writes.create_business(business).await
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    accounts: Arc<AccountStore>,
    businesses: Arc<BusinessStore>,
    addresses: Arc<AddressStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            businesses: Arc::new(BusinessStore::new(db.clone())),
            addresses: Arc::new(AddressStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn businesses(&self) -> Arc<dyn BusinessRepository> {
        self.businesses.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressRepository> {
        self.addresses.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
