//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod account_repository;
mod business_repository;
pub(crate) mod entities;

pub use account_repository::{AccountRepository, AccountStore};
pub use business_repository::{
    AddressRepository, AddressStore, BusinessRepository, BusinessStore,
};

pub(crate) use account_repository::insert_account;
pub(crate) use business_repository::{insert_address, insert_business};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use business_repository::{MockAddressRepository, MockBusinessRepository};
