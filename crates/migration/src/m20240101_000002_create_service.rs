//! Create `service` table with FKs to `user`.
//!
//! A row is one ride request: client, optional driver (set on accept),
//! pickup/destination coordinates and the lifecycle status column the
//! state machine compare-and-swaps against.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(big_integer(Service::Id).auto_increment().primary_key())
                    .col(big_integer(Service::ClientId).not_null())
                    // Nullable on purpose: absent until a driver accepts
                    .col(ColumnDef::new(Service::DriverId).big_integer().null())
                    .col(double(Service::PickupLat).not_null())
                    .col(double(Service::PickupLng).not_null())
                    .col(double(Service::DestinationLat).not_null())
                    .col(double(Service::DestinationLng).not_null())
                    .col(string_len(Service::Status, 32).not_null())
                    .col(ColumnDef::new(Service::CreatedBy).string_len(255).null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(ColumnDef::new(Service::UpdatedBy).string_len(255).null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_client")
                            .from(Service::Table, Service::ClientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_driver")
                            .from(Service::Table, Service::DriverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    ClientId,
    DriverId,
    PickupLat,
    PickupLng,
    DestinationLat,
    DestinationLng,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
