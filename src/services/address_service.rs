//! Address service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Address, AddressFields};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AddressService: Send + Sync {
    async fn list_addresses(&self) -> AppResult<Vec<Address>>;

    async fn get_address(&self, id: Uuid) -> AppResult<Address>;

    /// Update the address when `id` is given, otherwise create one
    async fn save_address(&self, id: Option<Uuid>, fields: AddressFields) -> AppResult<Address>;

    /// Delete and return the remaining addresses, most recently updated first
    async fn delete_address(&self, id: Uuid) -> AppResult<Vec<Address>>;
}

pub struct AddressManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AddressManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AddressService for AddressManager<U> {
    async fn list_addresses(&self) -> AppResult<Vec<Address>> {
        self.uow.addresses().list().await
    }

    async fn get_address(&self, id: Uuid) -> AppResult<Address> {
        self.uow.addresses().find_by_id(id).await?.ok_or_not_found()
    }

    async fn save_address(&self, id: Option<Uuid>, fields: AddressFields) -> AppResult<Address> {
        match id {
            Some(id) => self.uow.addresses().update(id, fields).await,
            None => self.uow.addresses().create(fields).await,
        }
    }

    async fn delete_address(&self, id: Uuid) -> AppResult<Vec<Address>> {
        self.uow.addresses().delete(id).await?;
        self.uow.addresses().list_recent().await
    }
}
