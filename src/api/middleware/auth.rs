//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated account attached to the request
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub user_id: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

/// Authentication middleware.
///
/// Resolves the bearer token to its account (the token must still be the
/// account's current session) and injects the CurrentUser into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let user = state.auth_service.authenticate(token).await?;
    let role = UserRole::parse(&user.role).map_err(|_| {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Account has an unknown role");
        AppError::Forbidden
    })?;

    request.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        role,
    });

    Ok(next.run(request).await)
}

/// Require the Super-Admin role.
pub fn require_super_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_super_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Allow the account owner or a Super-Admin.
pub fn require_self_or_super_admin(user: &CurrentUser, user_id: &str) -> Result<(), AppError> {
    if user.user_id == user_id || user.is_super_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
