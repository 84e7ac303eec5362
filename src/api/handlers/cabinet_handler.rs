//! Cabinet handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    CabinetDetail, CabinetPatch, CabinetSummary, NewCabinet, ProposedChange, SubmittedRequest,
};
use crate::errors::AppResult;
use crate::types::{Accepted, Created, NoContent, ResourceId};

/// Create cabinet routes
pub fn cabinet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cabinets).post(create_cabinet))
        .route("/approval-requests", post(request_cabinet))
        .route("/by-location/:location", get(get_cabinet_by_location))
        .route("/by-datacenter/:name", get(list_cabinets_by_data_center))
        .route(
            "/:id",
            get(get_cabinet).patch(update_cabinet).delete(delete_cabinet),
        )
        .route("/:id/deletion-requests", post(request_cabinet_deletion))
}

/// List every cabinet
#[utoipa::path(
    get,
    path = "/cabinets",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All cabinets", body = Vec<CabinetSummary>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_cabinets(State(state): State<AppState>) -> AppResult<Json<Vec<CabinetSummary>>> {
    Ok(Json(state.cabinet_service.list().await?))
}

/// List the cabinets of a data center as "id - location"
#[utoipa::path(
    get,
    path = "/cabinets/by-datacenter/{name}",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Data center name")),
    responses(
        (status = 200, description = "Cabinet labels", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Data center not found")
    )
)]
pub async fn list_cabinets_by_data_center(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.cabinet_service.list_by_data_center(&name).await?))
}

/// Get a cabinet by id
#[utoipa::path(
    get,
    path = "/cabinets/{id}",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cabinet ID")),
    responses(
        (status = 200, description = "Cabinet", body = CabinetDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cabinet not found")
    )
)]
pub async fn get_cabinet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CabinetDetail>> {
    Ok(Json(state.cabinet_service.get(id).await?))
}

/// Get a cabinet by location
#[utoipa::path(
    get,
    path = "/cabinets/by-location/{location}",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("location" = String, Path, description = "Cabinet location")),
    responses(
        (status = 200, description = "Cabinet", body = CabinetDetail),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cabinet not found")
    )
)]
pub async fn get_cabinet_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> AppResult<Json<CabinetDetail>> {
    Ok(Json(state.cabinet_service.get_by_location(&location).await?))
}

/// Create a cabinet
#[utoipa::path(
    post,
    path = "/cabinets",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    request_body = NewCabinet,
    responses(
        (status = 201, description = "Cabinet created", body = ResourceId),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Referenced data center, department, zone or row not found"),
        (status = 409, description = "Location already taken")
    )
)]
pub async fn create_cabinet(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewCabinet>,
) -> AppResult<Created<ResourceId>> {
    let id = state.cabinet_service.create(payload).await?;
    Ok(Created(ResourceId::from(id)))
}

/// Update the supplied fields of a cabinet
#[utoipa::path(
    patch,
    path = "/cabinets/{id}",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cabinet ID")),
    request_body = CabinetPatch,
    responses(
        (status = 200, description = "Cabinet updated", body = CabinetDetail),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cabinet or referenced row not found"),
        (status = 409, description = "Location already taken")
    )
)]
pub async fn update_cabinet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CabinetPatch>,
) -> AppResult<Json<CabinetDetail>> {
    Ok(Json(state.cabinet_service.update(id, payload).await?))
}

/// Delete a cabinet
#[utoipa::path(
    delete,
    path = "/cabinets/{id}",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cabinet ID")),
    responses(
        (status = 204, description = "Cabinet deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cabinet not found"),
        (status = 409, description = "Cabinet still holds devices")
    )
)]
pub async fn delete_cabinet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.cabinet_service.delete(id).await?;
    Ok(NoContent)
}

/// Ask a Super-Admin to approve a new cabinet
#[utoipa::path(
    post,
    path = "/cabinets/approval-requests",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    request_body = NewCabinet,
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Validation error or requester has no email"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "No approver can be notified")
    )
)]
pub async fn request_cabinet(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewCabinet>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(&current_user.user_id, ProposedChange::AddCabinet(payload))
        .await?;
    Ok(Accepted(submitted))
}

/// Ask a Super-Admin to approve deleting a cabinet
#[utoipa::path(
    post,
    path = "/cabinets/{id}/deletion-requests",
    tag = "Cabinets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cabinet ID")),
    responses(
        (status = 202, description = "Approval requested", body = SubmittedRequest),
        (status = 400, description = "Requester has no email"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cabinet not found")
    )
)]
pub async fn request_cabinet_deletion(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Accepted<SubmittedRequest>> {
    let submitted = state
        .request_service
        .submit(
            &current_user.user_id,
            ProposedChange::DeleteCabinet { cabinet_id: id },
        )
        .await?;
    Ok(Accepted(submitted))
}
