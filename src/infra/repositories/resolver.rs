//! Natural-key resolution.
//!
//! Every write names its references the way users do (data center name,
//! department name, "UserID, LastName", ...). These lookups turn them into
//! surrogate ids before the write is built, failing with `NotFound` when a
//! name does not exist.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::entities::{
    cabinet, cabinet_row, data_center, department, device_status, device_template, manufacturer,
    person, zone,
};
use crate::domain::reference::contact_user_id;
use crate::domain::{CabinetRef, TemplateSpec, Zone, ZoneSelection};
use crate::errors::{AppError, AppResult, OptionExt};

/// Lookups bound to one connection or transaction.
pub struct Resolver<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> Resolver<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn data_center_id(&self, name: &str) -> AppResult<i32> {
        data_center::Entity::find()
            .select_only()
            .column(data_center::Column::Id)
            .filter(data_center::Column::Name.eq(name.trim()))
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Data center '{}'", name.trim()))
    }

    pub async fn department_id(&self, name: &str) -> AppResult<i32> {
        department::Entity::find()
            .select_only()
            .column(department::Column::Id)
            .filter(department::Column::Name.eq(name.trim()))
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Department '{}'", name.trim()))
    }

    /// Resolve a zone selection. `Unassigned` resolves to no zone.
    pub async fn zone(&self, selection: &ZoneSelection) -> AppResult<Option<Zone>> {
        let ZoneSelection::Named(description) = selection else {
            return Ok(None);
        };
        let zone = zone::Entity::find()
            .filter(zone::Column::Description.eq(description.as_str()))
            .order_by_asc(zone::Column::Id)
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Zone '{}'", description))?;
        Ok(Some(zone.into()))
    }

    pub async fn cabinet_row_id(&self, name: &str) -> AppResult<i32> {
        cabinet_row::Entity::find()
            .select_only()
            .column(cabinet_row::Column::Id)
            .filter(cabinet_row::Column::Name.eq(name.trim()))
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Cabinet row '{}'", name.trim()))
    }

    pub async fn manufacturer_id(&self, name: &str) -> AppResult<i32> {
        manufacturer::Entity::find()
            .select_only()
            .column(manufacturer::Column::Id)
            .filter(manufacturer::Column::Name.eq(name.trim()))
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Manufacturer '{}'", name.trim()))
    }

    /// Template for a manufacturer and model.
    pub async fn template(&self, manufacturer: &str, model: &str) -> AppResult<TemplateSpec> {
        let manufacturer_id = self.manufacturer_id(manufacturer).await?;
        let template = device_template::Entity::find()
            .filter(device_template::Column::ManufacturerId.eq(manufacturer_id))
            .filter(device_template::Column::Model.eq(model.trim()))
            .one(self.conn)
            .await?
            .ok_or_not_found(format!(
                "Device template '{} {}'",
                manufacturer.trim(),
                model.trim()
            ))?;
        Ok(template.into())
    }

    /// Person id for `"UserID, LastName"`, `"UserID LastName"` or `"UserID"`.
    pub async fn person_id(&self, contact: &str) -> AppResult<i32> {
        let user_id = contact_user_id(contact)
            .ok_or_else(|| AppError::validation("primaryContact must start with a user id"))?;
        person::Entity::find()
            .select_only()
            .column(person::Column::Id)
            .filter(person::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(format!("Primary contact '{}'", user_id))
    }

    /// Cabinet inside the given data center, by id or by location.
    pub async fn cabinet_id(&self, data_center_id: i32, reference: &CabinetRef) -> AppResult<i32> {
        let query = cabinet::Entity::find()
            .select_only()
            .column(cabinet::Column::Id)
            .filter(cabinet::Column::DataCenterId.eq(data_center_id));
        let (query, label) = match reference {
            CabinetRef::Id(id) => (
                query.filter(cabinet::Column::Id.eq(*id)),
                format!("Cabinet {}", id),
            ),
            CabinetRef::Location(location) => (
                query.filter(cabinet::Column::Location.eq(location.as_str())),
                format!("Cabinet '{}'", location),
            ),
        };
        query
            .into_tuple::<i32>()
            .one(self.conn)
            .await?
            .ok_or_not_found(label)
    }

    /// Check a status against the device status list.
    pub async fn device_status(&self, status: &str) -> AppResult<String> {
        let status = status.trim();
        device_status::Entity::find()
            .select_only()
            .column(device_status::Column::Status)
            .filter(device_status::Column::Status.eq(status))
            .into_tuple::<String>()
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::validation(format!("Unknown device status '{}'", status)))
    }
}
