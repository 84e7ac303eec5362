//! User account handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_self_or_super_admin, require_super_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    AccountView, EmailCredentialUpdate, EmailUpdate, NewAccount, PasswordChange, RenameAccount,
    RoleUpdate,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, MessageResponse, NoContent};

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route("/:user_id", get(get_account).delete(delete_account))
        .route("/:user_id/username", put(rename_account))
        .route("/:user_id/email", put(update_email))
        .route("/:user_id/role", put(update_role))
        .route("/:user_id/email-credential", put(update_email_credential))
        .route("/:user_id/password", put(change_password))
}

/// List accounts (Super-Admin only)
#[utoipa::path(
    get,
    path = "/useraccounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = Vec<AccountView>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only")
    )
)]
pub async fn list_accounts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AccountView>>> {
    require_super_admin(&current_user)?;
    Ok(Json(state.account_service.list().await?))
}

/// Create an account (Super-Admin only)
#[utoipa::path(
    post,
    path = "/useraccounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = NewAccount,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only"),
        (status = 409, description = "User ID already exists")
    )
)]
pub async fn create_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewAccount>,
) -> AppResult<Created<AccountView>> {
    require_super_admin(&current_user)?;
    let account = state.account_service.create(payload).await?;
    Ok(Created(account))
}

/// Get an account (own account or Super-Admin)
#[utoipa::path(
    get,
    path = "/useraccounts/{user_id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = AccountView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<AccountView>> {
    require_self_or_super_admin(&current_user, &user_id)?;
    Ok(Json(state.account_service.get(&user_id).await?))
}

/// Remove an account (Super-Admin only, not your own)
#[utoipa::path(
    delete,
    path = "/useraccounts/{user_id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "Account removed"),
        (status = 400, description = "Cannot remove your own account"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<NoContent> {
    require_super_admin(&current_user)?;

    if current_user.user_id == user_id {
        return Err(AppError::validation("Cannot remove your own account"));
    }

    state.account_service.remove(&user_id).await?;
    Ok(NoContent)
}

/// Change an account's user id (Super-Admin only)
#[utoipa::path(
    put,
    path = "/useraccounts/{user_id}/username",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    request_body = RenameAccount,
    responses(
        (status = 200, description = "Account renamed", body = AccountView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "New user ID already exists")
    )
)]
pub async fn rename_account(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<RenameAccount>,
) -> AppResult<Json<AccountView>> {
    require_super_admin(&current_user)?;
    let account = state
        .account_service
        .rename(&user_id, &payload.new_user_id)
        .await?;
    Ok(Json(account))
}

/// Set or clear an account's email (own account or Super-Admin)
#[utoipa::path(
    put,
    path = "/useraccounts/{user_id}/email",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    request_body = EmailUpdate,
    responses(
        (status = 200, description = "Email updated", body = AccountView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_email(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<EmailUpdate>,
) -> AppResult<Json<AccountView>> {
    require_self_or_super_admin(&current_user, &user_id)?;
    Ok(Json(
        state.account_service.set_email(&user_id, payload.email).await?,
    ))
}

/// Change an account's role (Super-Admin only)
#[utoipa::path(
    put,
    path = "/useraccounts/{user_id}/role",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    request_body = RoleUpdate,
    responses(
        (status = 200, description = "Role updated", body = AccountView),
        (status = 400, description = "Unknown role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super-Admin only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_role(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<RoleUpdate>,
) -> AppResult<Json<AccountView>> {
    require_super_admin(&current_user)?;
    Ok(Json(
        state.account_service.set_role(&user_id, payload.role).await?,
    ))
}

/// Store or clear an account's email credential (own account or Super-Admin)
#[utoipa::path(
    put,
    path = "/useraccounts/{user_id}/email-credential",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    request_body = EmailCredentialUpdate,
    responses(
        (status = 200, description = "Credential updated", body = AccountView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_email_credential(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<EmailCredentialUpdate>,
) -> AppResult<Json<AccountView>> {
    require_self_or_super_admin(&current_user, &user_id)?;
    let account = state
        .account_service
        .set_email_credential(&user_id, payload.credential)
        .await?;
    Ok(Json(account))
}

/// Change your own password
#[utoipa::path(
    put,
    path = "/useraccounts/{user_id}/password",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    request_body = PasswordChange,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Current password is wrong"),
        (status = 403, description = "Forbidden - own account only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn change_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PasswordChange>,
) -> AppResult<Json<MessageResponse>> {
    if current_user.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    state
        .account_service
        .change_password(&user_id, &payload.current_password, &payload.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}
