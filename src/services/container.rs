//! Service Container - Centralized service access.
//!
//! Handlers depend on the service traits only; the container wires the
//! concrete implementations over one shared Unit of Work.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AddressManager, AddressService, AuthService, Authenticator,
    ContactRelay, ContactService, ProfileManager, ProfileService, TokenCodec,
};
use crate::config::Config;
use crate::infra::{Mailer, MediaStorage, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn addresses(&self) -> Arc<dyn AddressService>;

    fn contact(&self) -> Arc<dyn ContactService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    profile_service: Arc<dyn ProfileService>,
    address_service: Arc<dyn AddressService>,
    contact_service: Arc<dyn ContactService>,
}

impl Services {
    /// Wire every service over `uow`.
    pub fn build<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        config: &Config,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let codec = TokenCodec::from_config(config);
        let media = MediaStorage::new(config.media_root.clone());

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                codec,
                mailer.clone(),
                media.clone(),
            )),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            profile_service: Arc::new(ProfileManager::new(uow.clone(), media)),
            address_service: Arc::new(AddressManager::new(uow)),
            contact_service: Arc::new(ContactRelay::new(
                mailer,
                config.email_address.clone(),
                config.contact_subject.clone(),
            )),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profile_service.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressService> {
        self.address_service.clone()
    }

    fn contact(&self) -> Arc<dyn ContactService> {
        self.contact_service.clone()
    }
}
