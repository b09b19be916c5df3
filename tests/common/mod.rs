//! Shared fixtures: an in-memory Unit of Work and a recording mailer.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use account_api::config::Config;
use account_api::domain::{
    Account, AccountChanges, AccountRole, Address, AddressFields, Business, NewAccount, NewBusiness,
    Password,
};
use account_api::errors::{AppError, AppResult};
use account_api::infra::{
    AccountRepository, AddressRepository, BusinessRepository, MailError, MailMessage, Mailer,
    TransactionContext, TransactionalWrites, TxFuture, UnitOfWork,
};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// In-memory stores
// =============================================================================

#[derive(Default)]
pub struct MemoryAccounts {
    rows: Mutex<Vec<Account>>,
}

impl MemoryAccounts {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<Account> {
        self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }

    pub fn insert(&self, account: Account) {
        self.rows.lock().unwrap().push(account);
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.get(id))
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<Account>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.matches_identifier(identifier))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_email_ignore_case(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_by_role(&self, role: AccountRole) -> AppResult<Vec<Account>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.role == role)
            .cloned()
            .collect())
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        // Mirrors the LOWER(username) / LOWER(email) unique indexes
        if rows.iter().any(|a| {
            a.username.eq_ignore_ascii_case(&account.username)
                || a.email.eq_ignore_ascii_case(&account.email)
        }) {
            return Err(AppError::DuplicateAccount);
        }

        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            first_name: account.first_name,
            last_name: account.last_name,
            portrait: String::new(),
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: AccountChanges) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::AccountNotFound)?;

        account.username = changes.username;
        account.email = changes.email;
        account.role = changes.role;
        account.first_name = changes.first_name;
        account.last_name = changes.last_name;
        if let Some(hash) = changes.password_hash {
            account.password_hash = hash;
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::AccountNotFound)?;
        account.password_hash = password_hash;
        Ok(account.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: String,
        last_name: String,
        portrait: Option<String>,
    ) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        let account = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::AccountNotFound)?;
        account.first_name = first_name;
        account.last_name = last_name;
        if let Some(portrait) = portrait {
            account.portrait = portrait;
        }
        Ok(account.clone())
    }
}

#[derive(Default)]
pub struct MemoryBusinesses {
    rows: Mutex<Vec<Business>>,
}

impl MemoryBusinesses {
    pub fn insert_for(&self, admin_id: Uuid) -> Business {
        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            name: "Cafe".to_string(),
            description: String::new(),
            lat: 0.0,
            lng: 0.0,
            admin_id,
            address_id: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(business.clone());
        business
    }
}

impl MemoryBusinesses {
    pub fn all(&self) -> Vec<Business> {
        self.rows.lock().unwrap().clone()
    }
}

fn new_business(business: NewBusiness) -> Business {
    let now = Utc::now();
    Business {
        id: Uuid::new_v4(),
        name: business.name,
        description: business.description,
        lat: business.lat,
        lng: business.lng,
        admin_id: business.admin_id,
        address_id: business.address_id,
        image: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl BusinessRepository for MemoryBusinesses {
    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Option<Business>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.admin_id == admin_id)
            .cloned())
    }

    async fn create(&self, business: NewBusiness) -> AppResult<Business> {
        let created = new_business(business);
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn set_image(&self, id: Uuid, image: String) -> AppResult<Business> {
        let mut rows = self.rows.lock().unwrap();
        let business = rows.iter_mut().find(|b| b.id == id).ok_or(AppError::NotFound)?;
        business.image = Some(image);
        Ok(business.clone())
    }
}

#[derive(Default)]
pub struct MemoryAddresses {
    rows: Mutex<Vec<Address>>,
}

fn apply(address: &mut Address, fields: AddressFields) {
    address.street = fields.street;
    address.sub_locality = fields.sub_locality;
    address.postal_code = fields.postal_code;
    address.province = fields.province;
    address.city = fields.city;
    address.lat = fields.lat;
    address.lng = fields.lng;
}

impl MemoryAddresses {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn new_address(fields: AddressFields) -> Address {
    let now = Utc::now();
    let mut address = Address {
        id: Uuid::new_v4(),
        street: None,
        sub_locality: None,
        postal_code: None,
        province: None,
        city: None,
        lat: None,
        lng: None,
        created_at: now,
        updated_at: now,
    };
    apply(&mut address, fields);
    address
}

#[async_trait]
impl AddressRepository for MemoryAddresses {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Address>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn list_recent(&self) -> AppResult<Vec<Address>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn create(&self, fields: AddressFields) -> AppResult<Address> {
        let address = new_address(fields);
        self.rows.lock().unwrap().push(address.clone());
        Ok(address)
    }

    async fn update(&self, id: Uuid, fields: AddressFields) -> AppResult<Address> {
        let mut rows = self.rows.lock().unwrap();
        let address = rows.iter_mut().find(|a| a.id == id).ok_or(AppError::NotFound)?;
        apply(address, fields);
        address.updated_at = Utc::now();
        Ok(address.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Unit of Work over the in-memory stores.
#[derive(Default)]
pub struct MemoryUnitOfWork {
    pub accounts: Arc<MemoryAccounts>,
    pub businesses: Arc<MemoryBusinesses>,
    pub addresses: Arc<MemoryAddresses>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert an account directly, bypassing signup.
    pub fn seed_account(&self, username: &str, email: &str, password: &str, role: AccountRole) -> Account {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            portrait: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(account.clone());
        account
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
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
        let staged = StagedWrites::new(self);
        let result = f(TransactionContext::new(&staged)).await?;
        staged.commit(self);
        Ok(result)
    }
}

/// Writes held back until the transaction commits; dropped on error.
#[derive(Default)]
struct StagedWrites {
    taken: Vec<(String, String)>,
    accounts: Mutex<Vec<Account>>,
    addresses: Mutex<Vec<Address>>,
    businesses: Mutex<Vec<Business>>,
}

impl StagedWrites {
    fn new(uow: &MemoryUnitOfWork) -> Self {
        let taken = uow
            .accounts
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|a| (a.username.to_lowercase(), a.email.to_lowercase()))
            .collect();
        Self {
            taken,
            ..Self::default()
        }
    }

    fn commit(self, uow: &MemoryUnitOfWork) {
        for account in self.accounts.into_inner().unwrap() {
            uow.accounts.insert(account);
        }
        uow.addresses
            .rows
            .lock()
            .unwrap()
            .extend(self.addresses.into_inner().unwrap());
        uow.businesses
            .rows
            .lock()
            .unwrap()
            .extend(self.businesses.into_inner().unwrap());
    }
}

#[async_trait]
impl TransactionalWrites for StagedWrites {
    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        let username = account.username.to_lowercase();
        let email = account.email.to_lowercase();
        if self
            .taken
            .iter()
            .any(|(u, e)| *u == username || *e == email)
        {
            return Err(AppError::DuplicateAccount);
        }

        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            first_name: account.first_name,
            last_name: account.last_name,
            portrait: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.accounts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn create_address(&self, fields: AddressFields) -> AppResult<Address> {
        let address = new_address(fields);
        self.addresses.lock().unwrap().push(address.clone());
        Ok(address)
    }

    async fn create_business(&self, business: NewBusiness) -> AppResult<Business> {
        let created = new_business(business);
        self.businesses.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

// =============================================================================
// Mail
// =============================================================================

/// Mailer that records every message, optionally failing delivery.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Wait for detached deliveries to reach this mailer.
    pub async fn wait_for(&self, expected: usize) -> usize {
        for _ in 0..100 {
            if self.count() >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.count()
    }
}

/// Give detached tasks a chance to run on the test runtime.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message);
        if self.fail {
            Err(MailError::Delivery("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn test_config(media_root: &std::path::Path) -> Config {
    let mut config = Config::for_tests(TEST_SECRET);
    config.media_root = media_root.to_path_buf();
    config
}
