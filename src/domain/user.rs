//! User account entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_SUPER_ADMIN, ROLE_USER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    #[serde(rename = "Super-Admin")]
    SuperAdmin,
    Admin,
    User,
}

impl UserRole {
    /// Super-Admins manage accounts and decide approval requests
    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => ROLE_SUPER_ADMIN,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }

    /// Parse a stored or submitted role. Unknown values are rejected.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            ROLE_SUPER_ADMIN => Ok(UserRole::SuperAdmin),
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_USER => Ok(UserRole::User),
            other => Err(AppError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account as stored
#[derive(Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    pub password_hash: String,
    pub role: String,
    pub email: Option<String>,
    pub email_credential: Option<String>,
    pub session_token: Option<String>,
}

// Hash, credential and token stay out of logs
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("email_credential", &"[REDACTED]")
            .field("session_token", &"[REDACTED]")
            .finish()
    }
}

impl User {
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }
}

/// Account as returned to clients. Never carries secrets.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[serde(rename = "userID")]
    #[schema(example = "jdoe")]
    pub user_id: String,
    #[schema(example = "jdoe@example.com")]
    pub email: Option<String>,
    #[schema(example = "User")]
    pub role: String,
    /// Whether an email credential is stored
    pub has_email_credential: bool,
}

impl From<User> for AccountView {
    fn from(user: User) -> Self {
        Self {
            has_email_credential: user.email_credential.is_some(),
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Account creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(rename = "userID", alias = "userId")]
    #[validate(length(min = 1, max = 64, message = "userID must be 1-64 characters"))]
    #[schema(example = "jdoe")]
    pub user_id: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Defaults to `User`
    #[schema(example = "User")]
    pub role: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "jdoe@example.com")]
    pub email: Option<String>,
}

/// Body of `PUT /useraccounts/{user_id}/username`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RenameAccount {
    #[serde(rename = "newUserID", alias = "userID")]
    #[validate(length(min = 1, max = 64, message = "newUserID must be 1-64 characters"))]
    #[schema(example = "jdoe2")]
    pub new_user_id: String,
}

/// Body of `PUT /useraccounts/{user_id}/email`. `null` clears it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmailUpdate {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "jdoe@example.com")]
    pub email: Option<String>,
}

/// Body of `PUT /useraccounts/{user_id}/role`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RoleUpdate {
    pub role: UserRole,
}

/// Body of `PUT /useraccounts/{user_id}/email-credential`. `null` clears it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmailCredentialUpdate {
    #[validate(length(max = 255, message = "credential is too long"))]
    pub credential: Option<String>,
}

/// Body of `PUT /useraccounts/{user_id}/password`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "currentPassword is required"))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    #[schema(min_length = 8)]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            user_id: "jdoe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: role.to_string(),
            email: Some("jdoe@example.com".to_string()),
            email_credential: Some("app-password".to_string()),
            session_token: Some("sess-123".to_string()),
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("Super-Admin").unwrap(), UserRole::SuperAdmin);
        assert_eq!(UserRole::parse("User").unwrap(), UserRole::User);
        assert!(UserRole::parse("root").is_err());
        assert_eq!(UserRole::SuperAdmin.to_string(), "Super-Admin");
    }

    #[test]
    fn test_view_hides_secrets() {
        let view = AccountView::from(user("Admin"));
        assert!(view.has_email_credential);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("app-password"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"userID\":\"jdoe\""));
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", user("User"));
        assert!(!rendered.contains("app-password"));
        assert!(!rendered.contains("sess-123"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_update_bodies() {
        let role: RoleUpdate = serde_json::from_str(r#"{"role":"Super-Admin"}"#).unwrap();
        assert_eq!(role.role, UserRole::SuperAdmin);
        assert!(serde_json::from_str::<RoleUpdate>(r#"{"role":"root"}"#).is_err());

        let clear: EmailUpdate = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert!(clear.email.is_none());
        assert!(clear.validate().is_ok());

        let bad: EmailUpdate = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_super_admin() {
        assert!(user("Super-Admin").is_super_admin());
        assert!(!user("Admin").is_super_admin());
    }
}
