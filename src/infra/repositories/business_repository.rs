//! Business and address repositories.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::address::{self, Entity as AddressEntity};
use super::entities::business::{self, Entity as BusinessEntity};
use crate::domain::{Address, AddressFields, Business, NewBusiness};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Business repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Business owned by the given account, if any
    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Option<Business>>;

    async fn create(&self, business: NewBusiness) -> AppResult<Business>;

    async fn set_image(&self, id: Uuid, image: String) -> AppResult<Business>;
}

pub struct BusinessStore {
    db: DatabaseConnection,
}

impl BusinessStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BusinessRepository for BusinessStore {
    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Option<Business>> {
        let result = BusinessEntity::find()
            .filter(business::Column::AdminId.eq(admin_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Business::from))
    }

    async fn create(&self, business: NewBusiness) -> AppResult<Business> {
        insert_business(&self.db, business).await
    }

    async fn set_image(&self, id: Uuid, image: String) -> AppResult<Business> {
        let model = BusinessEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: business::ActiveModel = model.into();
        active.image = Set(Some(image));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Business::from(model))
    }
}

pub(crate) async fn insert_business<C: ConnectionTrait>(
    db: &C,
    business: NewBusiness,
) -> AppResult<Business> {
    let now = chrono::Utc::now();
    let active_model = business::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(business.name),
        description: Set(business.description),
        lat: Set(business.lat),
        lng: Set(business.lng),
        admin_id: Set(business.admin_id),
        address_id: Set(business.address_id),
        image: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await?;
    Ok(Business::from(model))
}

/// Address repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>>;

    async fn list(&self) -> AppResult<Vec<Address>>;

    /// All addresses, most recently updated first
    async fn list_recent(&self) -> AppResult<Vec<Address>>;

    async fn create(&self, fields: AddressFields) -> AppResult<Address>;

    async fn update(&self, id: Uuid, fields: AddressFields) -> AppResult<Address>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct AddressStore {
    db: DatabaseConnection,
}

impl AddressStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepository for AddressStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        let result = AddressEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Address::from))
    }

    async fn list(&self) -> AppResult<Vec<Address>> {
        let models = AddressEntity::find()
            .order_by_asc(address::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Address::from).collect())
    }

    async fn list_recent(&self) -> AppResult<Vec<Address>> {
        let models = AddressEntity::find()
            .order_by_desc(address::Column::UpdatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Address::from).collect())
    }

    async fn create(&self, fields: AddressFields) -> AppResult<Address> {
        insert_address(&self.db, fields).await
    }

    async fn update(&self, id: Uuid, fields: AddressFields) -> AppResult<Address> {
        let model = AddressEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: address::ActiveModel = model.into();
        active.street = Set(fields.street);
        active.sub_locality = Set(fields.sub_locality);
        active.postal_code = Set(fields.postal_code);
        active.province = Set(fields.province);
        active.city = Set(fields.city);
        active.lat = Set(fields.lat);
        active.lng = Set(fields.lng);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Address::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = AddressEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

pub(crate) async fn insert_address<C: ConnectionTrait>(
    db: &C,
    fields: AddressFields,
) -> AppResult<Address> {
    let now = chrono::Utc::now();
    let active_model = address::ActiveModel {
        id: Set(Uuid::new_v4()),
        street: Set(fields.street),
        sub_locality: Set(fields.sub_locality),
        postal_code: Set(fields.postal_code),
        province: Set(fields.province),
        city: Set(fields.city),
        lat: Set(fields.lat),
        lng: Set(fields.lng),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(db).await?;
    Ok(Address::from(model))
}
