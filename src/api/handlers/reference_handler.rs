//! Reference data handlers: one list endpoint per lookup table.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::errors::AppResult;

/// Create reference data routes. Each list is mounted at the root.
pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/datacenters", get(list_data_centers))
        .route("/departments", get(list_departments))
        .route("/zones", get(list_zones))
        .route("/cabinetrows", get(list_cabinet_rows))
        .route("/manufacturers", get(list_manufacturers))
        .route("/manufacturers/:name/models", get(list_models))
        .route("/people", get(list_people))
        .route("/tags", get(list_tags))
}

/// Data center names
#[utoipa::path(
    get,
    path = "/datacenters",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Data center names", body = Vec<String>))
)]
pub async fn list_data_centers(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.data_centers().await?))
}

/// Department names
#[utoipa::path(
    get,
    path = "/departments",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Department names", body = Vec<String>))
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.departments().await?))
}

/// Zone descriptions
#[utoipa::path(
    get,
    path = "/zones",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Zone descriptions", body = Vec<String>))
)]
pub async fn list_zones(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.zones().await?))
}

/// Cabinet row names
#[utoipa::path(
    get,
    path = "/cabinetrows",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Cabinet row names", body = Vec<String>))
)]
pub async fn list_cabinet_rows(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.cabinet_rows().await?))
}

/// Manufacturer names
#[utoipa::path(
    get,
    path = "/manufacturers",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Manufacturer names", body = Vec<String>))
)]
pub async fn list_manufacturers(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.manufacturers().await?))
}

/// Template models of one manufacturer
#[utoipa::path(
    get,
    path = "/manufacturers/{name}/models",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Manufacturer name")),
    responses(
        (status = 200, description = "Model names", body = Vec<String>),
        (status = 404, description = "Manufacturer not found")
    )
)]
pub async fn list_models(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.models(&name).await?))
}

/// Primary contacts as "UserID, LastName"
#[utoipa::path(
    get,
    path = "/people",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Contacts", body = Vec<String>))
)]
pub async fn list_people(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.people().await?))
}

/// Tag names
#[utoipa::path(
    get,
    path = "/tags",
    tag = "Reference data",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Tag names", body = Vec<String>))
)]
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.reference_service.tags().await?))
}
