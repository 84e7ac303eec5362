//! Migration: cabinets and the devices mounted in them.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_reference_tables::{
    CabinetRows, DataCenters, Departments, DeviceTemplates, People, Zones,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cabinets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cabinets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cabinets::Location).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Cabinets::LocationSortable)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Cabinets::DataCenterId).integer().not_null())
                    .col(ColumnDef::new(Cabinets::AssignedTo).integer().null())
                    .col(ColumnDef::new(Cabinets::ZoneId).integer().null())
                    .col(ColumnDef::new(Cabinets::CabRowId).integer().null())
                    .col(ColumnDef::new(Cabinets::CabinetHeight).integer().not_null().default(0))
                    .col(ColumnDef::new(Cabinets::U1Position).string_len(16).not_null().default(""))
                    .col(ColumnDef::new(Cabinets::Model).string_len(80).not_null().default(""))
                    .col(ColumnDef::new(Cabinets::KeyLock).string_len(30).not_null().default(""))
                    .col(ColumnDef::new(Cabinets::MaxKw).double().not_null().default(0.0))
                    .col(ColumnDef::new(Cabinets::MaxWeight).integer().not_null().default(0))
                    .col(ColumnDef::new(Cabinets::InstallationDate).date().not_null())
                    .col(ColumnDef::new(Cabinets::Notes).text().not_null())
                    .col(ColumnDef::new(Cabinets::MapX1).integer().not_null().default(0))
                    .col(ColumnDef::new(Cabinets::MapX2).integer().not_null().default(0))
                    .col(ColumnDef::new(Cabinets::MapY1).integer().not_null().default(0))
                    .col(ColumnDef::new(Cabinets::MapY2).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cabinets_data_center")
                            .from(Cabinets::Table, Cabinets::DataCenterId)
                            .to(DataCenters::Table, DataCenters::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cabinets_department")
                            .from(Cabinets::Table, Cabinets::AssignedTo)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cabinets_zone")
                            .from(Cabinets::Table, Cabinets::ZoneId)
                            .to(Zones::Table, Zones::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cabinets_row")
                            .from(Cabinets::Table, Cabinets::CabRowId)
                            .to(CabinetRows::Table, CabinetRows::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Location is unique within a data center
        manager
            .create_index(
                Index::create()
                    .name("idx_cabinets_data_center_location")
                    .table(Cabinets::Table)
                    .col(Cabinets::DataCenterId)
                    .col(Cabinets::Location)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Devices::Label).string_len(64).not_null())
                    .col(ColumnDef::new(Devices::SerialNo).string_len(40).not_null().default(""))
                    .col(ColumnDef::new(Devices::AssetTag).string_len(20).not_null().default(""))
                    .col(ColumnDef::new(Devices::PrimaryIp).string_len(254).not_null().default(""))
                    .col(ColumnDef::new(Devices::SnmpVersion).string_len(32).not_null())
                    .col(ColumnDef::new(Devices::SnmpCommunity).string_len(80).not_null().default(""))
                    .col(ColumnDef::new(Devices::V3SecurityLevel).string_len(12).not_null())
                    .col(ColumnDef::new(Devices::V3AuthProtocol).string_len(3).not_null())
                    .col(ColumnDef::new(Devices::V3PrivProtocol).string_len(3).not_null())
                    .col(ColumnDef::new(Devices::Hypervisor).string_len(40).not_null())
                    .col(ColumnDef::new(Devices::Owner).integer().not_null())
                    .col(ColumnDef::new(Devices::PrimaryContact).integer().not_null())
                    .col(ColumnDef::new(Devices::CabinetId).integer().not_null())
                    .col(ColumnDef::new(Devices::Position).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::Height).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::TemplateId).integer().null())
                    .col(ColumnDef::new(Devices::Weight).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::NominalWatts).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Devices::PowerSupplyCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Devices::Ports).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::ChassisSlots).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::RearChassisSlots).integer().not_null().default(0))
                    .col(ColumnDef::new(Devices::InstallDate).date().not_null())
                    .col(ColumnDef::new(Devices::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Devices::HalfDepth).boolean().not_null().default(false))
                    .col(ColumnDef::new(Devices::BackSide).boolean().not_null().default(false))
                    .col(ColumnDef::new(Devices::Notes).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_owner")
                            .from(Devices::Table, Devices::Owner)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_primary_contact")
                            .from(Devices::Table, Devices::PrimaryContact)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_cabinet")
                            .from(Devices::Table, Devices::CabinetId)
                            .to(Cabinets::Table, Cabinets::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_template")
                            .from(Devices::Table, Devices::TemplateId)
                            .to(DeviceTemplates::Table, DeviceTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_devices_cabinet")
                    .table(Devices::Table)
                    .col(Devices::CabinetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Devices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cabinets::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cabinets {
    Table,
    Id,
    Location,
    LocationSortable,
    DataCenterId,
    AssignedTo,
    ZoneId,
    CabRowId,
    CabinetHeight,
    U1Position,
    Model,
    KeyLock,
    MaxKw,
    MaxWeight,
    InstallationDate,
    Notes,
    MapX1,
    MapX2,
    MapY1,
    MapY2,
}

#[derive(DeriveIden)]
enum Devices {
    Table,
    Id,
    Label,
    SerialNo,
    AssetTag,
    PrimaryIp,
    SnmpVersion,
    SnmpCommunity,
    V3SecurityLevel,
    V3AuthProtocol,
    V3PrivProtocol,
    Hypervisor,
    Owner,
    PrimaryContact,
    CabinetId,
    Position,
    Height,
    TemplateId,
    Weight,
    NominalWatts,
    PowerSupplyCount,
    Ports,
    ChassisSlots,
    RearChassisSlots,
    InstallDate,
    Status,
    HalfDepth,
    BackSide,
    Notes,
}
