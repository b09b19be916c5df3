//! Business database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Business;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    #[sea_orm(unique)]
    pub admin_id: Uuid,
    pub address_id: Option<Uuid>,
    pub image: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AdminId",
        to = "super::account::Column::Id"
    )]
    Admin,
    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::AddressId",
        to = "super::address::Column::Id"
    )]
    Address,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Business {
    fn from(model: Model) -> Self {
        Business {
            id: model.id,
            name: model.name,
            description: model.description,
            lat: model.lat,
            lng: model.lng,
            admin_id: model.admin_id,
            address_id: model.address_id,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
