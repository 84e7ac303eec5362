//! Approval request handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_super_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{ApprovalRequest, DecisionRequest, RequestStatus};
use crate::errors::AppResult;

/// Filter for the request list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestFilter {
    /// Pending, Approved or Rejected
    #[param(example = "Pending")]
    pub status: Option<String>,
}

/// Create approval request routes
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests))
        .route("/:id", get(get_request))
        .route("/:id/decision", post(decide_request))
}

/// List requests, optionally by status
#[utoipa::path(
    get,
    path = "/requests",
    tag = "Requests",
    security(("bearer_auth" = [])),
    params(RequestFilter),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<ApprovalRequest>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(filter): Query<RequestFilter>,
) -> AppResult<Json<Vec<ApprovalRequest>>> {
    let status = filter
        .status
        .as_deref()
        .map(str::parse::<RequestStatus>)
        .transpose()?;
    Ok(Json(state.request_service.list(status).await?))
}

/// Get a request by id
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "Requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = ApprovalRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApprovalRequest>> {
    Ok(Json(state.request_service.get(id).await?))
}

/// Approve or reject a pending request (Super-Admin only)
///
/// Approving applies the stored change in the same transaction.
#[utoipa::path(
    post,
    path = "/requests/{id}/decision",
    tag = "Requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Request decided", body = ApprovalRequest),
        (status = 400, description = "Status is not Approved or Rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only"),
        (status = 404, description = "Request or its target not found"),
        (status = 409, description = "Request is no longer pending")
    )
)]
pub async fn decide_request(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<DecisionRequest>,
) -> AppResult<Json<ApprovalRequest>> {
    require_super_admin(&current_user)?;

    let request = state
        .request_service
        .decide(id, &payload.status, &current_user.user_id)
        .await?;
    Ok(Json(request))
}
