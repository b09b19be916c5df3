//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod account;
pub mod business;
pub mod password;

pub use account::{Account, AccountChanges, AccountRole, AccountSummary, NewAccount, PublicProfile};
pub use business::{Address, AddressFields, Business, NewBusiness};
pub use password::Password;
