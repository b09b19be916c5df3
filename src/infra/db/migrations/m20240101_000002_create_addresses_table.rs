//! Migration: Create addresses table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Addresses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Addresses::Street).string().null())
                    .col(ColumnDef::new(Addresses::SubLocality).string().null())
                    .col(ColumnDef::new(Addresses::PostalCode).string_len(32).null())
                    .col(ColumnDef::new(Addresses::Province).string().null())
                    .col(ColumnDef::new(Addresses::City).string().null())
                    .col(ColumnDef::new(Addresses::Lat).double().null())
                    .col(ColumnDef::new(Addresses::Lng).double().null())
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Addresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_addresses_updated_at")
                    .table(Addresses::Table)
                    .col(Addresses::UpdatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Addresses {
    Table,
    Id,
    Street,
    SubLocality,
    PostalCode,
    Province,
    City,
    Lat,
    Lng,
    CreatedAt,
    UpdatedAt,
}
