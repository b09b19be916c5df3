//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Caching and sessions (Redis)
//! - Outgoing mail (SMTP)
//! - Media files on local disk
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod mailer;
pub mod media;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use mailer::{build_mailer, LogMailer, MailError, MailMessage, Mailer, SmtpMailer};
pub use media::{MediaStorage, Upload};
pub use repositories::{
    AccountRepository, AccountStore, AddressRepository, AddressStore, BusinessRepository,
    BusinessStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TransactionalWrites, TxFuture, UnitOfWork,
};

#[cfg(test)]
pub use mailer::MockMailer;
