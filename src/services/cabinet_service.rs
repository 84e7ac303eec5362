//! Cabinet service - rack inventory.
//!
//! Writes resolve every natural key (data center, department, zone, row)
//! inside the same transaction as the insert or update, so a missing
//! reference leaves nothing behind.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::spreadsheet::date_or_default;
use crate::domain::{
    CabinetDetail, CabinetPatch, CabinetSummary, MapRect, NewCabinet, ZoneSelection,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{CabinetChanges, CabinetRecord};
use crate::infra::{TransactionContext, UnitOfWork};

/// Cabinet service trait for dependency injection.
#[async_trait]
pub trait CabinetService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<CabinetSummary>>;

    /// "id - location" entries of one data center
    async fn list_by_data_center(&self, data_center: &str) -> AppResult<Vec<String>>;

    async fn get(&self, id: i32) -> AppResult<CabinetDetail>;

    async fn get_by_location(&self, location: &str) -> AppResult<CabinetDetail>;

    /// Insert a cabinet and return its id
    async fn create(&self, cabinet: NewCabinet) -> AppResult<i32>;

    /// Apply the supplied fields only and return the updated view
    async fn update(&self, id: i32, patch: CabinetPatch) -> AppResult<CabinetDetail>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of CabinetService using Unit of Work.
pub struct CabinetManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CabinetManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve and insert a new cabinet inside an open transaction.
pub(crate) async fn create_cabinet_in(
    ctx: &TransactionContext<'_>,
    cabinet: NewCabinet,
) -> AppResult<i32> {
    let resolver = ctx.resolver();
    let location = cabinet.location.trim().to_string();
    if location.is_empty() {
        return Err(AppError::validation("location is required"));
    }

    let data_center_id = resolver.data_center_id(&cabinet.data_center).await?;
    if ctx
        .cabinets()
        .location_taken(data_center_id, &location, None)
        .await?
    {
        return Err(AppError::conflict(format!(
            "Cabinet '{}' in data center '{}'",
            location,
            cabinet.data_center.trim()
        )));
    }

    let assigned_to = match non_blank(cabinet.assigned_to.as_deref()) {
        Some(department) => Some(resolver.department_id(department).await?),
        None => None,
    };
    let cab_row_id = match non_blank(cabinet.cabinet_row.as_deref()) {
        Some(row) => Some(resolver.cabinet_row_id(row).await?),
        None => None,
    };
    let zone = resolver
        .zone(&ZoneSelection::parse(cabinet.zone.as_deref()))
        .await?;

    let map = zone.as_ref().map_or(MapRect::ZERO, |z| z.map).overridden_by(
        cabinet.map_x1,
        cabinet.map_x2,
        cabinet.map_y1,
        cabinet.map_y2,
    );

    let record = CabinetRecord {
        location_sortable: non_blank(cabinet.location_sortable.as_deref())
            .unwrap_or(&location)
            .to_string(),
        location,
        data_center_id,
        assigned_to,
        zone_id: zone.map(|z| z.id),
        cab_row_id,
        cabinet_height: cabinet.cabinet_height.unwrap_or(0),
        u1_position: cabinet.u1_position.unwrap_or_default(),
        model: cabinet.model.unwrap_or_default(),
        key_lock: cabinet.key_lock_info.unwrap_or_default(),
        max_kw: cabinet.max_kw.unwrap_or(0.0),
        max_weight: cabinet.max_weight.unwrap_or(0),
        installation_date: date_or_default(cabinet.date_of_installation.as_ref())?,
        notes: cabinet.notes.unwrap_or_default(),
        map,
    };

    let id = ctx.cabinets().insert(record).await?;
    tracing::info!(cabinet_id = id, "Cabinet created");
    Ok(id)
}

/// Delete an empty cabinet inside an open transaction.
pub(crate) async fn delete_cabinet_in(ctx: &TransactionContext<'_>, id: i32) -> AppResult<()> {
    let devices = ctx.cabinets().device_count(id).await?;
    if devices > 0 {
        return Err(AppError::invalid_state(format!(
            "Cabinet {} still holds {} device(s)",
            id, devices
        )));
    }
    if ctx.cabinets().delete(id).await? == 0 {
        return Err(AppError::not_found(format!("Cabinet {}", id)));
    }
    tracing::info!(cabinet_id = id, "Cabinet deleted");
    Ok(())
}

async fn update_cabinet_in(
    ctx: &TransactionContext<'_>,
    id: i32,
    patch: CabinetPatch,
) -> AppResult<CabinetDetail> {
    let current = ctx
        .cabinets()
        .find_detail(id)
        .await?
        .ok_or_not_found(format!("Cabinet {}", id))?;
    let current_data_center = ctx
        .cabinets()
        .data_center_of(id)
        .await?
        .ok_or_not_found(format!("Cabinet {}", id))?;

    let resolver = ctx.resolver();
    let mut changes = CabinetChanges::default();

    let data_center_id = match non_blank(patch.data_center.as_deref()) {
        Some(name) => {
            let data_center_id = resolver.data_center_id(name).await?;
            changes.data_center_id = Some(data_center_id);
            data_center_id
        }
        None => current_data_center,
    };

    let location = match non_blank(patch.location.as_deref()) {
        Some(location) => location.to_string(),
        None => current.location.clone(),
    };
    if patch.location.is_some() || changes.data_center_id.is_some() {
        if ctx
            .cabinets()
            .location_taken(data_center_id, &location, Some(id))
            .await?
        {
            return Err(AppError::conflict(format!("Cabinet '{}'", location)));
        }
    }
    if patch.location.is_some() {
        changes.location = Some(location);
    }

    changes.assigned_to = match patch.assigned_to {
        Some(department) => match non_blank(department.as_deref()) {
            Some(name) => Some(Some(resolver.department_id(name).await?)),
            None => Some(None),
        },
        None => None,
    };
    changes.cab_row_id = match patch.cabinet_row {
        Some(row) => match non_blank(row.as_deref()) {
            Some(name) => Some(Some(resolver.cabinet_row_id(name).await?)),
            None => Some(None),
        },
        None => None,
    };

    // A zone change re-seeds the map for corners the caller left out
    let mut map = MapRect {
        x1: current.map_x1,
        x2: current.map_x2,
        y1: current.map_y1,
        y2: current.map_y2,
    };
    if let Some(zone) = patch.zone.as_deref() {
        let zone = resolver.zone(&ZoneSelection::parse(Some(zone))).await?;
        map = zone.as_ref().map_or(MapRect::ZERO, |z| z.map);
        changes.zone_id = Some(zone.map(|z| z.id));
    }
    let placed = map.overridden_by(patch.map_x1, patch.map_x2, patch.map_y1, patch.map_y2);
    if changes.zone_id.is_some() {
        changes.map_x1 = Some(placed.x1);
        changes.map_x2 = Some(placed.x2);
        changes.map_y1 = Some(placed.y1);
        changes.map_y2 = Some(placed.y2);
    } else {
        changes.map_x1 = patch.map_x1;
        changes.map_x2 = patch.map_x2;
        changes.map_y1 = patch.map_y1;
        changes.map_y2 = patch.map_y2;
    }

    changes.location_sortable = patch.location_sortable;
    changes.cabinet_height = patch.cabinet_height;
    changes.u1_position = patch.u1_position;
    changes.model = patch.model;
    changes.key_lock = patch.key_lock_info;
    changes.max_kw = patch.max_kw;
    changes.max_weight = patch.max_weight;
    changes.installation_date = patch
        .date_of_installation
        .as_ref()
        .map(|d| d.to_date())
        .transpose()?;
    changes.notes = patch.notes;

    ctx.cabinets().update(id, changes).await?;
    tracing::info!(cabinet_id = id, "Cabinet updated");

    ctx.cabinets()
        .find_detail(id)
        .await?
        .ok_or_not_found(format!("Cabinet {}", id))
}

#[async_trait]
impl<U: UnitOfWork> CabinetService for CabinetManager<U> {
    async fn list(&self) -> AppResult<Vec<CabinetSummary>> {
        self.uow.cabinets().list().await
    }

    async fn list_by_data_center(&self, data_center: &str) -> AppResult<Vec<String>> {
        self.uow.cabinets().list_by_data_center(data_center).await
    }

    async fn get(&self, id: i32) -> AppResult<CabinetDetail> {
        self.uow
            .cabinets()
            .find_detail(id)
            .await?
            .ok_or_not_found(format!("Cabinet {}", id))
    }

    async fn get_by_location(&self, location: &str) -> AppResult<CabinetDetail> {
        self.uow
            .cabinets()
            .find_detail_by_location(location.trim())
            .await?
            .ok_or_not_found(format!("Cabinet '{}'", location.trim()))
    }

    async fn create(&self, cabinet: NewCabinet) -> AppResult<i32> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { create_cabinet_in(&ctx, cabinet).await }))
            .await
    }

    async fn update(&self, id: i32, patch: CabinetPatch) -> AppResult<CabinetDetail> {
        if patch.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        self.uow
            .transaction(move |ctx| Box::pin(async move { update_cabinet_in(&ctx, id, patch).await }))
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { delete_cabinet_in(&ctx, id).await }))
            .await
    }
}
