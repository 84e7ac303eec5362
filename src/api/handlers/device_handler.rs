//! Device handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    DeviceDetail, DevicePatch, ImportReport, NewDevice, ProposedChange, SubmittedRequest,
};
use crate::errors::AppResult;
use crate::types::{Accepted, Created, NoContent, ResourceId};

/// Bulk import body. Rows are validated one by one so a bad row only
/// fails itself.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkImportRequest {
    #[validate(length(min = 1, max = 1000, message = "devices must hold 1-1000 rows"))]
    pub devices: Vec<NewDevice>,
}

/// Create device routes
pub fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_device))
        .route("/statuses", get(list_device_statuses))
        .route("/bulk", post(bulk_import_devices))
        .route("/approval-requests", post(request_device))
        .route("/bulk/approval-requests", post(request_bulk_import))
        .route("/by-cabinet/:cabinet_id", get(list_devices_by_cabinet))
        .route(
            "/:id",
            get(get_device).patch(update_device).delete(delete_device),
        )
        .route("/:id/update-requests", post(request_device_update))
        .route("/:id/deletion-requests", post(request_device_deletion))
}

/// Device status values
#[utoipa::path(
    get,
    path = "/devices/statuses",
    tag = "Devices",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status names", body = Vec<String>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_device_statuses(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.device_statuses().await?))
}

/// List the devices in a cabinet as "id - label"
#[utoipa::path(
    get,
    path = "/devices/by-cabinet/{cabinet_id}",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("cabinet_id" = i32, Path, description = "Cabinet ID")),
    responses(
        (status = 200, description = "Device labels", body = Vec<String>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_devices_by_cabinet(
    State(state): State<AppState>,
    Path(cabinet_id): Path<i32>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.device_service.by_cabinet(cabinet_id).await?))
}

/// Get a device by id
#[utoipa::path(
    get,
    path = "/devices/{id}",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 200, description = "Device", body = DeviceDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<DeviceDetail>> {
    Ok(Json(state.device_service.get(id).await?))
}

/// Create a device
#[utoipa::path(
    post,
    path = "/devices",
    tag = "Devices",
    security(("bearer_auth" = [])),
    request_body = NewDevice,
    responses(
        (status = 201, description = "Device created", body = ResourceId),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Owner, contact, cabinet or template not found")
    )
)]
pub async fn create_device(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewDevice>,
) -> AppResult<Created<ResourceId>> {
    let id = state.device_service.create(payload).await?;
    Ok(Created(ResourceId::from(id)))
}

/// Import a batch of devices, isolating failures per row
#[utoipa::path(
    post,
    path = "/devices/bulk",
    tag = "Devices",
    security(("bearer_auth" = [])),
    request_body = BulkImportRequest,
    responses(
        (status = 200, description = "Import report", body = ImportReport),
        (status = 400, description = "Empty or oversized batch"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn bulk_import_devices(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkImportRequest>,
) -> AppResult<Json<ImportReport>> {
    Ok(Json(state.device_service.bulk_import(payload.devices).await?))
}

/// Update the supplied fields of a device
#[utoipa::path(
    patch,
    path = "/devices/{id}",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Device ID")),
    request_body = DevicePatch,
    responses(
        (status = 200, description = "Device updated", body = DeviceDetail),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Device or referenced row not found")
    )
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<DevicePatch>,
) -> AppResult<Json<DeviceDetail>> {
    Ok(Json(state.device_service.update(id, payload).await?))
}

/// Delete a device
#[utoipa::path(
    delete,
    path = "/devices/{id}",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.device_service.delete(id).await?;
    Ok(NoContent)
}

/// Ask a Super-Admin to approve a new device
#[utoipa::path(
    post,
    path = "/devices/approval-requests",
    tag = "Devices",
    security(("bearer_auth" = [])),
    request_body = NewDevice,
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Validation error or requester has no email"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn request_device(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewDevice>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(&current_user.user_id, ProposedChange::AddDevice(payload))
        .await?;
    Ok(Accepted(submitted))
}

/// Ask a Super-Admin to approve a bulk import
#[utoipa::path(
    post,
    path = "/devices/bulk/approval-requests",
    tag = "Devices",
    security(("bearer_auth" = [])),
    request_body = BulkImportRequest,
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Validation error or requester has no email"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn request_bulk_import(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BulkImportRequest>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(
            &current_user.user_id,
            ProposedChange::BulkImportDevices {
                devices: payload.devices,
            },
        )
        .await?;
    Ok(Accepted(submitted))
}

/// Ask a Super-Admin to approve a device update
#[utoipa::path(
    post,
    path = "/devices/{id}/update-requests",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Device ID")),
    request_body = DevicePatch,
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Validation error or requester has no email"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn request_device_update(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<DevicePatch>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(
            &current_user.user_id,
            ProposedChange::UpdateDevice {
                device_id: id,
                patch: payload,
            },
        )
        .await?;
    Ok(Accepted(submitted))
}

/// Ask a Super-Admin to approve deleting a device
#[utoipa::path(
    post,
    path = "/devices/{id}/deletion-requests",
    tag = "Devices",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Device ID")),
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Requester has no email"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Device not found")
    )
)]
pub async fn request_device_deletion(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(
            &current_user.user_id,
            ProposedChange::DeleteDevice { device_id: id },
        )
        .await?;
    Ok(Accepted(submitted))
}
