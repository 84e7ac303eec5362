//! Session handlers: login, whoami and logout.

use axum::{
    extract::{Extension, State},
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
use crate::domain::AccountView;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::NoContent;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(rename = "userID", alias = "userId")]
    #[validate(length(min = 1, message = "userID is required"))]
    #[schema(example = "jdoe")]
    pub user_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Public login route. Mounted under the stricter rate limit.
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// Routes acting on the caller's own session.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/current", get(whoami).delete(logout))
}

/// Login and get a bearer token
///
/// Any earlier token of the same account stops validating.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.user_id, payload.password)
        .await?;

    Ok(Json(token))
}

/// Echo the authenticated account
#[utoipa::path(
    get,
    path = "/sessions/current",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated account", body = AccountView),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn whoami(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AccountView>> {
    let account = state.account_service.get(&current_user.user_id).await?;
    Ok(Json(account))
}

/// Logout, clearing the stored session token
#[utoipa::path(
    delete,
    path = "/sessions/current",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<NoContent> {
    state.auth_service.logout(&current_user.user_id).await?;
    Ok(NoContent)
}
