//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and reach the stores through the Unit of Work.

mod account_service;
mod address_service;
mod auth_service;
mod contact_service;
pub mod container;
mod profile_service;
mod token;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService, AccountUpdate};
pub use address_service::{AddressManager, AddressService};
pub use auth_service::{AuthOutcome, AuthService, Authenticator, BusinessRegistration, SignupInput};
pub use contact_service::{ContactRelay, ContactRequest, ContactService};
pub use profile_service::{ProfileManager, ProfileService, ProfileUpdate};
pub use token::{SessionClaims, TokenCodec};
