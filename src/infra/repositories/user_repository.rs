//! User account repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::update_set::UpdateSet;
use crate::config::ROLE_SUPER_ADMIN;
use crate::domain::User;
use crate::errors::{AppError, AppResult, DbResultExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Single-column updates return NotFound when the account does not exist.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by login id
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>>;

    /// List all accounts ordered by id
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Notification addresses of every Super-Admin that has one
    async fn super_admin_emails(&self) -> AppResult<Vec<String>>;

    /// Create a new account. Conflict if the id is taken.
    async fn create(
        &self,
        user_id: String,
        password_hash: String,
        role: String,
        email: Option<String>,
    ) -> AppResult<User>;

    /// Remove an account. NotFound if absent.
    async fn delete(&self, user_id: &str) -> AppResult<()>;

    /// Change the login id. Conflict if the new id is taken.
    async fn rename(&self, user_id: &str, new_user_id: &str) -> AppResult<()>;

    async fn set_email(&self, user_id: &str, email: Option<String>) -> AppResult<()>;

    async fn set_role(&self, user_id: &str, role: String) -> AppResult<()>;

    async fn set_email_credential(&self, user_id: &str, credential: Option<String>)
        -> AppResult<()>;

    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> AppResult<()>;

    /// Store or clear the current session token
    async fn set_session_token(&self, user_id: &str, token: Option<String>) -> AppResult<()>;
}

/// User queries over any connection.
pub struct UserQueries<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> UserQueries<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(user_id.to_string())
            .one(self.conn)
            .await?;
        Ok(result.map(User::from))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::UserId)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn super_admin_emails(&self) -> AppResult<Vec<String>> {
        let emails = UserEntity::find()
            .select_only()
            .column(user::Column::Email)
            .filter(user::Column::Role.eq(ROLE_SUPER_ADMIN))
            .filter(user::Column::Email.is_not_null())
            .order_by_asc(user::Column::UserId)
            .into_tuple::<Option<String>>()
            .all(self.conn)
            .await?;
        Ok(emails
            .into_iter()
            .flatten()
            .filter(|email| !email.trim().is_empty())
            .collect())
    }

    async fn exists(&self, user_id: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::UserId.eq(user_id))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        &self,
        user_id: String,
        password_hash: String,
        role: String,
        email: Option<String>,
    ) -> AppResult<User> {
        if self.exists(&user_id).await? {
            return Err(AppError::conflict(format!("User '{}'", user_id)));
        }

        let model = ActiveModel {
            user_id: Set(user_id.clone()),
            password_hash: Set(password_hash),
            role: Set(role),
            email: Set(email),
            email_credential: Set(None),
            session_token: Set(None),
        };
        UserEntity::insert(model)
            .exec_without_returning(self.conn)
            .await
            .conflict_on_duplicate(format!("User '{}'", user_id))?;

        self.find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::internal("Created user could not be read back"))
    }

    pub async fn delete(&self, user_id: &str) -> AppResult<()> {
        let result = UserEntity::delete_by_id(user_id.to_string())
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(format!("User '{}'", user_id)));
        }
        Ok(())
    }

    /// Update one account's columns. Existence is checked first since an
    /// update that changes nothing reports zero affected rows on MySQL.
    async fn update_columns(&self, user_id: &str, set: UpdateSet<UserEntity>) -> AppResult<()> {
        if !self.exists(user_id).await? {
            return Err(AppError::not_found(format!("User '{}'", user_id)));
        }
        set.exec(self.conn, user::Column::UserId.eq(user_id)).await?;
        Ok(())
    }

    pub async fn rename(&self, user_id: &str, new_user_id: &str) -> AppResult<()> {
        if user_id == new_user_id {
            return match self.exists(user_id).await? {
                true => Ok(()),
                false => Err(AppError::not_found(format!("User '{}'", user_id))),
            };
        }
        if self.exists(new_user_id).await? {
            return Err(AppError::conflict(format!("User '{}'", new_user_id)));
        }
        let mut set = UpdateSet::new();
        set.set(user::Column::UserId, new_user_id.to_string());
        self.update_columns(user_id, set)
            .await
            .conflict_on_duplicate(format!("User '{}'", new_user_id))
    }

    pub async fn set_email(&self, user_id: &str, email: Option<String>) -> AppResult<()> {
        let mut set = UpdateSet::new();
        set.set(user::Column::Email, email);
        self.update_columns(user_id, set).await
    }

    pub async fn set_role(&self, user_id: &str, role: String) -> AppResult<()> {
        let mut set = UpdateSet::new();
        set.set(user::Column::Role, role);
        self.update_columns(user_id, set).await
    }

    pub async fn set_email_credential(
        &self,
        user_id: &str,
        credential: Option<String>,
    ) -> AppResult<()> {
        let mut set = UpdateSet::new();
        set.set(user::Column::EmailCredential, credential);
        self.update_columns(user_id, set).await
    }

    pub async fn set_password_hash(&self, user_id: &str, password_hash: String) -> AppResult<()> {
        let mut set = UpdateSet::new();
        set.set(user::Column::PasswordHash, password_hash);
        self.update_columns(user_id, set).await
    }

    pub async fn set_session_token(&self, user_id: &str, token: Option<String>) -> AppResult<()> {
        let mut set = UpdateSet::new();
        set.set(user::Column::SessionToken, token);
        self.update_columns(user_id, set).await
    }
}

/// Pool-backed UserRepository.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> UserQueries<'_, DatabaseConnection> {
        UserQueries::new(&self.db)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.queries().find_by_id(user_id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        self.queries().list().await
    }

    async fn super_admin_emails(&self) -> AppResult<Vec<String>> {
        self.queries().super_admin_emails().await
    }

    async fn create(
        &self,
        user_id: String,
        password_hash: String,
        role: String,
        email: Option<String>,
    ) -> AppResult<User> {
        self.queries()
            .create(user_id, password_hash, role, email)
            .await
    }

    async fn delete(&self, user_id: &str) -> AppResult<()> {
        self.queries().delete(user_id).await
    }

    async fn rename(&self, user_id: &str, new_user_id: &str) -> AppResult<()> {
        self.queries().rename(user_id, new_user_id).await
    }

    async fn set_email(&self, user_id: &str, email: Option<String>) -> AppResult<()> {
        self.queries().set_email(user_id, email).await
    }

    async fn set_role(&self, user_id: &str, role: String) -> AppResult<()> {
        self.queries().set_role(user_id, role).await
    }

    async fn set_email_credential(
        &self,
        user_id: &str,
        credential: Option<String>,
    ) -> AppResult<()> {
        self.queries().set_email_credential(user_id, credential).await
    }

    async fn set_password_hash(&self, user_id: &str, password_hash: String) -> AppResult<()> {
        self.queries().set_password_hash(user_id, password_hash).await
    }

    async fn set_session_token(&self, user_id: &str, token: Option<String>) -> AppResult<()> {
        self.queries().set_session_token(user_id, token).await
    }
}
