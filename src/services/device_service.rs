//! Device service - equipment mounted in cabinets.
//!
//! Creation resolves owner, primary contact, cabinet, template and status
//! before the insert, all in one transaction. Bulk import runs each row in
//! its own savepoint so a bad row is reported without undoing the others.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::config::{DEFAULT_DEVICE_STATUS, DEFAULT_HYPERVISOR, MAX_BULK_IMPORT_ROWS};
use crate::domain::spreadsheet::date_or_default;
use crate::domain::{
    CabinetRef, DeviceDetail, DevicePatch, ImportFailure, ImportReport, ImportedDevice,
    NewDevice, TemplateSpec,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{DeviceChanges, DeviceRecord};
use crate::infra::{TransactionContext, UnitOfWork};

/// Device service trait for dependency injection.
#[async_trait]
pub trait DeviceService: Send + Sync {
    /// "id - label" entries of one cabinet
    async fn by_cabinet(&self, cabinet_id: i32) -> AppResult<Vec<String>>;

    async fn get(&self, id: i32) -> AppResult<DeviceDetail>;

    /// Insert a device and return its id
    async fn create(&self, device: NewDevice) -> AppResult<i32>;

    /// Insert every row that resolves; report the rest
    async fn bulk_import(&self, devices: Vec<NewDevice>) -> AppResult<ImportReport>;

    async fn update(&self, id: i32, patch: DevicePatch) -> AppResult<DeviceDetail>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of DeviceService using Unit of Work.
pub struct DeviceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DeviceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Check a batch size before any row is touched.
pub(crate) fn check_batch(devices: &[NewDevice]) -> AppResult<()> {
    if devices.is_empty() {
        return Err(AppError::validation("At least one device is required"));
    }
    if devices.len() as u64 > MAX_BULK_IMPORT_ROWS {
        return Err(AppError::validation(format!(
            "A bulk import takes at most {} devices",
            MAX_BULK_IMPORT_ROWS
        )));
    }
    Ok(())
}

/// Resolve and insert one device inside an open transaction.
pub(crate) async fn create_device_in(
    ctx: &TransactionContext<'_>,
    device: &NewDevice,
) -> AppResult<i32> {
    let resolver = ctx.resolver();

    let owner = resolver.department_id(&device.owner).await?;
    let primary_contact = resolver.person_id(&device.primary_contact).await?;
    let data_center_id = resolver.data_center_id(&device.data_center).await?;
    let cabinet_id = resolver
        .cabinet_id(data_center_id, &CabinetRef::parse(&device.cabinet))
        .await?;
    let template = match device.template_key() {
        Some((manufacturer, model)) => resolver.template(manufacturer, model).await?,
        None => TemplateSpec::default(),
    };
    let status = resolver
        .device_status(non_blank(device.status.as_deref()).unwrap_or(DEFAULT_DEVICE_STATUS))
        .await?;

    let record = DeviceRecord {
        label: device.label.trim().to_string(),
        serial_no: device.serial_no.clone().unwrap_or_default(),
        asset_tag: device.asset_tag.clone().unwrap_or_default(),
        primary_ip: device.primary_ip.clone().unwrap_or_default(),
        snmp_community: device.snmp_community.clone().unwrap_or_default(),
        hypervisor: non_blank(device.hypervisor.as_deref())
            .unwrap_or(DEFAULT_HYPERVISOR)
            .to_string(),
        owner,
        primary_contact,
        cabinet_id,
        position: device.position.unwrap_or(0),
        template,
        install_date: date_or_default(device.install_date.as_ref())?,
        status,
        half_depth: device.half_depth.unwrap_or(false),
        back_side: device.backside.unwrap_or(false),
        notes: device.notes.clone().unwrap_or_default(),
    };

    let id = ctx.devices().insert(record).await?;
    tracing::info!(device_id = id, cabinet_id, "Device created");
    Ok(id)
}

/// Insert a batch row by row, each in its own savepoint.
pub(crate) async fn import_devices_in(
    ctx: &TransactionContext<'_>,
    devices: Vec<NewDevice>,
) -> AppResult<ImportReport> {
    let mut report = ImportReport::default();

    for (index, device) in devices.into_iter().enumerate() {
        let label = device.label.trim().to_string();

        if let Err(errors) = device.validate() {
            report.failed.push(ImportFailure {
                index,
                label,
                reason: errors.to_string(),
            });
            continue;
        }

        let savepoint = ctx.savepoint().await?;
        let outcome = {
            let row_ctx = savepoint.context();
            create_device_in(&row_ctx, &device).await
        };

        match outcome {
            Ok(id) => {
                savepoint.commit().await?;
                report.succeeded.push(ImportedDevice { index, id, label });
            }
            Err(error) => {
                savepoint.rollback().await?;
                tracing::debug!(index, error = %error, "Import row rejected");
                report.failed.push(ImportFailure {
                    index,
                    label,
                    reason: error.to_string(),
                });
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Bulk import finished"
    );
    Ok(report)
}

/// Apply a partial update inside an open transaction.
pub(crate) async fn update_device_in(
    ctx: &TransactionContext<'_>,
    id: i32,
    patch: DevicePatch,
) -> AppResult<()> {
    if !ctx.devices().exists(id).await? {
        return Err(AppError::not_found(format!("Device {}", id)));
    }

    let resolver = ctx.resolver();
    let owner = match non_blank(patch.owner.as_deref()) {
        Some(department) => Some(resolver.department_id(department).await?),
        None => None,
    };
    let primary_contact = match non_blank(patch.primary_contact.as_deref()) {
        Some(contact) => Some(resolver.person_id(contact).await?),
        None => None,
    };
    let template_id = match (
        non_blank(patch.manufacturer.as_deref()),
        non_blank(patch.model.as_deref()),
    ) {
        (Some(manufacturer), Some(model)) => resolver.template(manufacturer, model).await?.template_id,
        (None, None) => None,
        _ => {
            return Err(AppError::validation(
                "manufacturer and model must be given together",
            ))
        }
    };
    let status = match non_blank(patch.status.as_deref()) {
        Some(status) => Some(resolver.device_status(status).await?),
        None => None,
    };

    let changes = DeviceChanges {
        label: patch.label.map(|l| l.trim().to_string()),
        position: patch.position,
        height: patch.height,
        primary_ip: patch.primary_ip,
        serial_no: patch.serial_no,
        asset_tag: patch.asset_tag,
        half_depth: patch.half_depth,
        back_side: patch.backside,
        hypervisor: patch.hypervisor,
        install_date: patch.install_date.as_ref().map(|d| d.to_date()).transpose()?,
        status,
        owner,
        primary_contact,
        template_id,
        notes: patch.notes,
    };

    ctx.devices().update(id, changes).await?;
    tracing::info!(device_id = id, "Device updated");
    Ok(())
}

/// Delete a device inside an open transaction.
pub(crate) async fn delete_device_in(ctx: &TransactionContext<'_>, id: i32) -> AppResult<()> {
    if ctx.devices().delete(id).await? == 0 {
        return Err(AppError::not_found(format!("Device {}", id)));
    }
    tracing::info!(device_id = id, "Device deleted");
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> DeviceService for DeviceManager<U> {
    async fn by_cabinet(&self, cabinet_id: i32) -> AppResult<Vec<String>> {
        self.uow.devices().list_by_cabinet(cabinet_id).await
    }

    async fn get(&self, id: i32) -> AppResult<DeviceDetail> {
        self.uow
            .devices()
            .find_detail(id)
            .await?
            .ok_or_not_found(format!("Device {}", id))
    }

    async fn create(&self, device: NewDevice) -> AppResult<i32> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { create_device_in(&ctx, &device).await }))
            .await
    }

    async fn bulk_import(&self, devices: Vec<NewDevice>) -> AppResult<ImportReport> {
        check_batch(&devices)?;
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { import_devices_in(&ctx, devices).await })
            })
            .await
    }

    async fn update(&self, id: i32, patch: DevicePatch) -> AppResult<DeviceDetail> {
        if patch.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    update_device_in(&ctx, id, patch).await?;
                    ctx.devices()
                        .find_detail(id)
                        .await?
                        .ok_or_not_found(format!("Device {}", id))
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { delete_device_in(&ctx, id).await }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_limits() {
        assert!(matches!(check_batch(&[]), Err(AppError::Validation(_))));

        let row = NewDevice::new("sw", "Network", "jdoe", "DC1", "A-01");
        assert!(check_batch(std::slice::from_ref(&row)).is_ok());

        let oversized = vec![row; MAX_BULK_IMPORT_ROWS as usize + 1];
        assert!(matches!(check_batch(&oversized), Err(AppError::Validation(_))));
    }
}
