//! Device persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::entities::{cabinet, data_center, department, device, device_template, manufacturer, person};
use super::update_set::UpdateSet;
use crate::config::{
    DEFAULT_V3_AUTH_PROTOCOL, DEFAULT_V3_PRIV_PROTOCOL, DEFAULT_V3_SECURITY_LEVEL,
};
use crate::domain::device::device_label;
use crate::domain::{DeviceDetail, TemplateSpec};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A device ready to insert, with every reference resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub label: String,
    pub serial_no: String,
    pub asset_tag: String,
    pub primary_ip: String,
    pub snmp_community: String,
    pub hypervisor: String,
    pub owner: i32,
    pub primary_contact: i32,
    pub cabinet_id: i32,
    pub position: i32,
    pub template: TemplateSpec,
    pub install_date: NaiveDate,
    pub status: String,
    pub half_depth: bool,
    pub back_side: bool,
    pub notes: String,
}

/// Resolved partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceChanges {
    pub label: Option<String>,
    pub position: Option<i32>,
    pub height: Option<i32>,
    pub primary_ip: Option<String>,
    pub serial_no: Option<String>,
    pub asset_tag: Option<String>,
    pub half_depth: Option<bool>,
    pub back_side: Option<bool>,
    pub hypervisor: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub owner: Option<i32>,
    pub primary_contact: Option<i32>,
    pub template_id: Option<i32>,
    pub notes: Option<String>,
}

impl DeviceChanges {
    fn into_update_set(self) -> UpdateSet<device::Entity> {
        use device::Column;

        let mut set = UpdateSet::new();
        set.set_opt(Column::Label, self.label)
            .set_opt(Column::Position, self.position)
            .set_opt(Column::Height, self.height)
            .set_opt(Column::PrimaryIp, self.primary_ip)
            .set_opt(Column::SerialNo, self.serial_no)
            .set_opt(Column::AssetTag, self.asset_tag)
            .set_opt(Column::HalfDepth, self.half_depth)
            .set_opt(Column::BackSide, self.back_side)
            .set_opt(Column::Hypervisor, self.hypervisor)
            .set_opt(Column::InstallDate, self.install_date)
            .set_opt(Column::Status, self.status)
            .set_opt(Column::Owner, self.owner)
            .set_opt(Column::PrimaryContact, self.primary_contact)
            .set_opt(Column::TemplateId, self.template_id)
            .set_opt(Column::Notes, self.notes);
        set
    }
}

/// Device repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Devices in a cabinet as "id - label". NotFound if the cabinet does
    /// not exist.
    async fn list_by_cabinet(&self, cabinet_id: i32) -> AppResult<Vec<String>>;

    async fn find_detail(&self, id: i32) -> AppResult<Option<DeviceDetail>>;
}

#[derive(Debug, FromQueryResult)]
struct DeviceDetailRow {
    id: i32,
    label: String,
    position: i32,
    height: i32,
    primary_ip: String,
    serial_no: String,
    asset_tag: String,
    half_depth: bool,
    back_side: bool,
    hypervisor: String,
    install_date: NaiveDate,
    status: String,
    cabinet_id: i32,
    snmp_version: String,
    notes: String,
    owner_name: Option<String>,
    contact_user_id: Option<String>,
    contact_last_name: Option<String>,
    template_model: Option<String>,
    manufacturer_name: Option<String>,
    cabinet_location: Option<String>,
    data_center_name: Option<String>,
}

impl From<DeviceDetailRow> for DeviceDetail {
    fn from(row: DeviceDetailRow) -> Self {
        let primary_contact = row.contact_user_id.map(|user_id| match row.contact_last_name {
            Some(last) if !last.is_empty() => format!("{} {}", user_id, last),
            _ => user_id,
        });
        DeviceDetail {
            id: row.id,
            label: row.label,
            position: row.position,
            height: row.height,
            primary_ip: row.primary_ip,
            serial_no: row.serial_no,
            asset_tag: row.asset_tag,
            half_depth: row.half_depth,
            backside: row.back_side,
            hypervisor: row.hypervisor,
            install_date: row.install_date,
            status: row.status,
            owner: row.owner_name,
            primary_contact,
            model: row.template_model,
            manufacturer: row.manufacturer_name,
            cabinet_id: row.cabinet_id,
            cabinet: row.cabinet_location,
            data_center: row.data_center_name,
            snmp_version: row.snmp_version,
            notes: row.notes,
        }
    }
}

/// Device queries over any connection.
pub struct DeviceQueries<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DeviceQueries<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn list_by_cabinet(&self, cabinet_id: i32) -> AppResult<Vec<String>> {
        cabinet::Entity::find_by_id(cabinet_id)
            .select_only()
            .column(cabinet::Column::Id)
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Cabinet {}", cabinet_id))?;

        let rows = device::Entity::find()
            .select_only()
            .column(device::Column::Id)
            .column(device::Column::Label)
            .filter(device::Column::CabinetId.eq(cabinet_id))
            .order_by_asc(device::Column::Position)
            .order_by_asc(device::Column::Id)
            .into_tuple::<(i32, String)>()
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, label)| device_label(id, &label))
            .collect())
    }

    pub async fn find_detail(&self, id: i32) -> AppResult<Option<DeviceDetail>> {
        use device::Column;

        let row = device::Entity::find()
            .select_only()
            .columns([
                Column::Id,
                Column::Label,
                Column::Position,
                Column::Height,
                Column::PrimaryIp,
                Column::SerialNo,
                Column::AssetTag,
                Column::HalfDepth,
                Column::BackSide,
                Column::Hypervisor,
                Column::InstallDate,
                Column::Status,
                Column::CabinetId,
                Column::SnmpVersion,
                Column::Notes,
            ])
            .column_as(department::Column::Name, "owner_name")
            .column_as(person::Column::UserId, "contact_user_id")
            .column_as(person::Column::LastName, "contact_last_name")
            .column_as(device_template::Column::Model, "template_model")
            .column_as(manufacturer::Column::Name, "manufacturer_name")
            .column_as(cabinet::Column::Location, "cabinet_location")
            .column_as(data_center::Column::Name, "data_center_name")
            .join(JoinType::LeftJoin, device::Relation::Owner.def())
            .join(JoinType::LeftJoin, device::Relation::PrimaryContact.def())
            .join(JoinType::LeftJoin, device::Relation::Template.def())
            .join(JoinType::LeftJoin, device_template::Relation::Manufacturer.def())
            .join(JoinType::LeftJoin, device::Relation::Cabinet.def())
            .join(JoinType::LeftJoin, cabinet::Relation::DataCenter.def())
            .filter(Column::Id.eq(id))
            .into_model::<DeviceDetailRow>()
            .one(self.conn)
            .await?;

        Ok(row.map(DeviceDetail::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = device::Entity::find()
            .filter(device::Column::Id.eq(id))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn insert(&self, record: DeviceRecord) -> AppResult<i32> {
        let template = record.template;
        let model = device::ActiveModel {
            label: Set(record.label),
            serial_no: Set(record.serial_no),
            asset_tag: Set(record.asset_tag),
            primary_ip: Set(record.primary_ip),
            snmp_version: Set(template.snmp_version),
            snmp_community: Set(record.snmp_community),
            v3_security_level: Set(DEFAULT_V3_SECURITY_LEVEL.to_string()),
            v3_auth_protocol: Set(DEFAULT_V3_AUTH_PROTOCOL.to_string()),
            v3_priv_protocol: Set(DEFAULT_V3_PRIV_PROTOCOL.to_string()),
            hypervisor: Set(record.hypervisor),
            owner: Set(record.owner),
            primary_contact: Set(record.primary_contact),
            cabinet_id: Set(record.cabinet_id),
            position: Set(record.position),
            height: Set(template.height),
            template_id: Set(template.template_id),
            weight: Set(template.weight),
            nominal_watts: Set(template.wattage),
            power_supply_count: Set(template.power_supply_count),
            ports: Set(template.ports),
            chassis_slots: Set(template.chassis_slots),
            rear_chassis_slots: Set(template.rear_chassis_slots),
            install_date: Set(record.install_date),
            status: Set(record.status),
            half_depth: Set(record.half_depth),
            back_side: Set(record.back_side),
            notes: Set(record.notes),
            ..Default::default()
        };
        let result = device::Entity::insert(model).exec(self.conn).await?;
        Ok(result.last_insert_id)
    }

    /// Apply the supplied columns to one device.
    pub async fn update(&self, id: i32, changes: DeviceChanges) -> AppResult<()> {
        changes
            .into_update_set()
            .exec(self.conn, device::Column::Id.eq(id))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = device::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}

/// Pool-backed DeviceRepository.
pub struct DeviceStore {
    db: DatabaseConnection,
}

impl DeviceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> DeviceQueries<'_, DatabaseConnection> {
        DeviceQueries::new(&self.db)
    }
}

#[async_trait]
impl DeviceRepository for DeviceStore {
    async fn list_by_cabinet(&self, cabinet_id: i32) -> AppResult<Vec<String>> {
        self.queries().list_by_cabinet(cabinet_id).await
    }

    async fn find_detail(&self, id: i32) -> AppResult<Option<DeviceDetail>> {
        self.queries().find_detail(id).await
    }
}
