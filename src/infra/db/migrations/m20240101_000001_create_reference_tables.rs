//! Migration: reference tables (data centers, departments, zones, rows,
//! manufacturers, device templates, people, device statuses, tags).

use sea_orm_migration::prelude::*;

use crate::config::DEFAULT_DEVICE_STATUSES;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, column) in [
            (DataCenters::Table.into_iden(), DataCenters::Name.into_iden()),
            (Departments::Table.into_iden(), Departments::Name.into_iden()),
            (CabinetRows::Table.into_iden(), CabinetRows::Name.into_iden()),
            (Manufacturers::Table.into_iden(), Manufacturers::Name.into_iden()),
            (Tags::Table.into_iden(), Tags::Name.into_iden()),
            (DeviceStatuses::Table.into_iden(), DeviceStatuses::Status.into_iden()),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Alias::new("id"))
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(column).string_len(128).not_null().unique_key())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Zones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Zones::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Zones::Description).string_len(128).not_null())
                    .col(ColumnDef::new(Zones::MapX1).integer().not_null().default(0))
                    .col(ColumnDef::new(Zones::MapX2).integer().not_null().default(0))
                    .col(ColumnDef::new(Zones::MapY1).integer().not_null().default(0))
                    .col(ColumnDef::new(Zones::MapY2).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_zones_description")
                    .table(Zones::Table)
                    .col(Zones::Description)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(People::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(People::UserId).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(People::LastName).string_len(128).not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeviceTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeviceTemplates::ManufacturerId).integer().not_null())
                    .col(ColumnDef::new(DeviceTemplates::Model).string_len(128).not_null())
                    .col(ColumnDef::new(DeviceTemplates::Height).integer().not_null().default(0))
                    .col(ColumnDef::new(DeviceTemplates::Weight).integer().not_null().default(0))
                    .col(ColumnDef::new(DeviceTemplates::Wattage).integer().not_null().default(0))
                    .col(ColumnDef::new(DeviceTemplates::PsCount).integer().not_null().default(1))
                    .col(ColumnDef::new(DeviceTemplates::NumPorts).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(DeviceTemplates::ChassisSlots)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::RearChassisSlots)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DeviceTemplates::SnmpVersion)
                            .string_len(32)
                            .not_null()
                            .default("noAuthNoPriv"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_templates_manufacturer")
                            .from(DeviceTemplates::Table, DeviceTemplates::ManufacturerId)
                            .to(Manufacturers::Table, Manufacturers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_device_templates_manufacturer_model")
                    .table(DeviceTemplates::Table)
                    .col(DeviceTemplates::ManufacturerId)
                    .col(DeviceTemplates::Model)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(DeviceStatuses::Table)
            .columns([DeviceStatuses::Status]);
        for status in DEFAULT_DEVICE_STATUSES {
            seed.values([(*status).into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            DeviceTemplates::Table.into_iden(),
            People::Table.into_iden(),
            Zones::Table.into_iden(),
            DeviceStatuses::Table.into_iden(),
            Tags::Table.into_iden(),
            Manufacturers::Table.into_iden(),
            CabinetRows::Table.into_iden(),
            Departments::Table.into_iden(),
            DataCenters::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum DataCenters {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum Departments {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum Zones {
    Table,
    Id,
    Description,
    MapX1,
    MapX2,
    MapY1,
    MapY2,
}

#[derive(DeriveIden)]
pub(super) enum CabinetRows {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum Manufacturers {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum DeviceTemplates {
    Table,
    Id,
    ManufacturerId,
    Model,
    Height,
    Weight,
    Wattage,
    PsCount,
    NumPorts,
    ChassisSlots,
    RearChassisSlots,
    SnmpVersion,
}

#[derive(DeriveIden)]
pub(super) enum People {
    Table,
    Id,
    UserId,
    LastName,
}

#[derive(DeriveIden)]
enum DeviceStatuses {
    Table,
    Status,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Name,
}
