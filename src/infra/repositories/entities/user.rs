//! User account entity.

use sea_orm::entity::prelude::*;

use crate::domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub password_hash: String,
    pub role: String,
    pub email: Option<String>,
    pub email_credential: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub session_token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            user_id: model.user_id,
            password_hash: model.password_hash,
            role: model.role,
            email: model.email,
            email_credential: model.email_credential,
            session_token: model.session_token,
        }
    }
}
