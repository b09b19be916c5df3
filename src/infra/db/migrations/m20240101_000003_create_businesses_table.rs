//! Migration: Create businesses table.
//!
//! Each business belongs to exactly one business-role account.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts_table::Accounts;
use super::m20240101_000002_create_addresses_table::Addresses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Businesses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Businesses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Businesses::Name).string().not_null())
                    .col(ColumnDef::new(Businesses::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Businesses::Lat).double().not_null())
                    .col(ColumnDef::new(Businesses::Lng).double().not_null())
                    .col(ColumnDef::new(Businesses::AdminId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Businesses::AddressId).uuid().null())
                    .col(ColumnDef::new(Businesses::Image).string().null())
                    .col(
                        ColumnDef::new(Businesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Businesses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_businesses_admin")
                            .from(Businesses::Table, Businesses::AdminId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_businesses_address")
                            .from(Businesses::Table, Businesses::AddressId)
                            .to(Addresses::Table, Addresses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Businesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
    Name,
    Description,
    Lat,
    Lng,
    AdminId,
    AddressId,
    Image,
    CreatedAt,
    UpdatedAt,
}
