//! Account service - user account management.
//!
//! Each update touches a single column; permission checks (Super-Admin or
//! the account owner) are made by the handlers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AccountView, NewAccount, Password, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<AccountView>>;

    async fn get(&self, user_id: &str) -> AppResult<AccountView>;

    /// Hash the password and store a new account. Role defaults to `User`.
    async fn create(&self, account: NewAccount) -> AppResult<AccountView>;

    async fn remove(&self, user_id: &str) -> AppResult<()>;

    async fn rename(&self, user_id: &str, new_user_id: &str) -> AppResult<AccountView>;

    async fn set_email(&self, user_id: &str, email: Option<String>) -> AppResult<AccountView>;

    async fn set_role(&self, user_id: &str, role: UserRole) -> AppResult<AccountView>;

    async fn set_email_credential(
        &self,
        user_id: &str,
        credential: Option<String>,
    ) -> AppResult<AccountView>;

    /// Replace the password after checking the current one.
    async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn view(&self, user_id: &str) -> AppResult<AccountView> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .map(AccountView::from)
            .ok_or_not_found(format!("User '{}'", user_id))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn list(&self) -> AppResult<Vec<AccountView>> {
        let users = self.uow.users().list().await?;
        Ok(users.into_iter().map(AccountView::from).collect())
    }

    async fn get(&self, user_id: &str) -> AppResult<AccountView> {
        self.view(user_id).await
    }

    async fn create(&self, account: NewAccount) -> AppResult<AccountView> {
        let user_id = account.user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(AppError::validation("userID is required"));
        }
        let role = match account.role.as_deref() {
            Some(role) => UserRole::parse(role.trim())?,
            None => UserRole::User,
        };
        let password_hash = Password::new(&account.password)?.into_string();

        let user = self
            .uow
            .users()
            .create(
                user_id,
                password_hash,
                role.as_str().to_string(),
                non_blank(account.email),
            )
            .await?;

        tracing::info!(user_id = %user.user_id, role = %user.role, "Account created");
        Ok(AccountView::from(user))
    }

    async fn remove(&self, user_id: &str) -> AppResult<()> {
        self.uow.users().delete(user_id).await?;
        tracing::info!(user_id = %user_id, "Account removed");
        Ok(())
    }

    async fn rename(&self, user_id: &str, new_user_id: &str) -> AppResult<AccountView> {
        let new_user_id = new_user_id.trim();
        if new_user_id.is_empty() {
            return Err(AppError::validation("newUserID is required"));
        }
        self.uow.users().rename(user_id, new_user_id).await?;
        tracing::info!(from = %user_id, to = %new_user_id, "Account renamed");
        self.view(new_user_id).await
    }

    async fn set_email(&self, user_id: &str, email: Option<String>) -> AppResult<AccountView> {
        self.uow.users().set_email(user_id, non_blank(email)).await?;
        self.view(user_id).await
    }

    async fn set_role(&self, user_id: &str, role: UserRole) -> AppResult<AccountView> {
        self.uow
            .users()
            .set_role(user_id, role.as_str().to_string())
            .await?;
        tracing::info!(user_id = %user_id, role = %role, "Role changed");
        self.view(user_id).await
    }

    async fn set_email_credential(
        &self,
        user_id: &str,
        credential: Option<String>,
    ) -> AppResult<AccountView> {
        let credential = credential.filter(|c| !c.is_empty());
        self.uow
            .users()
            .set_email_credential(user_id, credential)
            .await?;
        self.view(user_id).await
    }

    async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(format!("User '{}'", user_id))?;

        if !Password::from_hash(user.password_hash).verify(current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = Password::new(new_password)?.into_string();
        self.uow
            .users()
            .set_password_hash(user_id, password_hash)
            .await?;
        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
