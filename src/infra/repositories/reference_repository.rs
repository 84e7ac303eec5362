//! Read-only reference lists.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::entities::{
    cabinet_row, data_center, department, device_status, device_template, manufacturer, person,
    tag, zone,
};
use super::resolver::Resolver;
use crate::domain::reference::format_contact;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Reference repository trait for dependency injection.
///
/// Every list is ordered by name; an empty table yields an empty list.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn data_centers(&self) -> AppResult<Vec<String>>;

    async fn departments(&self) -> AppResult<Vec<String>>;

    /// Zone descriptions
    async fn zones(&self) -> AppResult<Vec<String>>;

    async fn cabinet_rows(&self) -> AppResult<Vec<String>>;

    async fn manufacturers(&self) -> AppResult<Vec<String>>;

    /// Template models of one manufacturer. NotFound if the manufacturer
    /// does not exist.
    async fn models_by_manufacturer(&self, manufacturer: &str) -> AppResult<Vec<String>>;

    /// People formatted as "UserID, LastName"
    async fn people(&self) -> AppResult<Vec<String>>;

    async fn tags(&self) -> AppResult<Vec<String>>;

    async fn device_statuses(&self) -> AppResult<Vec<String>>;
}

/// Reference queries over any connection.
pub struct ReferenceQueries<'c, C: ConnectionTrait> {
    conn: &'c C,
}

macro_rules! name_list {
    ($conn:expr, $entity:ident, $column:ident) => {
        $entity::Entity::find()
            .select_only()
            .column($entity::Column::$column)
            .order_by_asc($entity::Column::$column)
            .into_tuple::<String>()
            .all($conn)
    };
}

impl<'c, C: ConnectionTrait> ReferenceQueries<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn data_centers(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, data_center, Name).await?)
    }

    pub async fn departments(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, department, Name).await?)
    }

    pub async fn zones(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, zone, Description).await?)
    }

    pub async fn cabinet_rows(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, cabinet_row, Name).await?)
    }

    pub async fn manufacturers(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, manufacturer, Name).await?)
    }

    pub async fn models_by_manufacturer(&self, manufacturer: &str) -> AppResult<Vec<String>> {
        let manufacturer_id = Resolver::new(self.conn).manufacturer_id(manufacturer).await?;
        Ok(device_template::Entity::find()
            .select_only()
            .column(device_template::Column::Model)
            .filter(device_template::Column::ManufacturerId.eq(manufacturer_id))
            .order_by_asc(device_template::Column::Model)
            .into_tuple::<String>()
            .all(self.conn)
            .await?)
    }

    pub async fn people(&self) -> AppResult<Vec<String>> {
        let rows = person::Entity::find()
            .order_by_asc(person::Column::UserId)
            .all(self.conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|p| format_contact(&p.user_id, &p.last_name))
            .collect())
    }

    pub async fn tags(&self) -> AppResult<Vec<String>> {
        Ok(name_list!(self.conn, tag, Name).await?)
    }

    /// Statuses in their seeded order.
    pub async fn device_statuses(&self) -> AppResult<Vec<String>> {
        Ok(device_status::Entity::find()
            .select_only()
            .column(device_status::Column::Status)
            .order_by_asc(device_status::Column::Id)
            .into_tuple::<String>()
            .all(self.conn)
            .await?)
    }
}

/// Pool-backed ReferenceRepository.
pub struct ReferenceStore {
    db: DatabaseConnection,
}

impl ReferenceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> ReferenceQueries<'_, DatabaseConnection> {
        ReferenceQueries::new(&self.db)
    }
}

#[async_trait]
impl ReferenceRepository for ReferenceStore {
    async fn data_centers(&self) -> AppResult<Vec<String>> {
        self.queries().data_centers().await
    }

    async fn departments(&self) -> AppResult<Vec<String>> {
        self.queries().departments().await
    }

    async fn zones(&self) -> AppResult<Vec<String>> {
        self.queries().zones().await
    }

    async fn cabinet_rows(&self) -> AppResult<Vec<String>> {
        self.queries().cabinet_rows().await
    }

    async fn manufacturers(&self) -> AppResult<Vec<String>> {
        self.queries().manufacturers().await
    }

    async fn models_by_manufacturer(&self, manufacturer: &str) -> AppResult<Vec<String>> {
        self.queries().models_by_manufacturer(manufacturer).await
    }

    async fn people(&self) -> AppResult<Vec<String>> {
        self.queries().people().await
    }

    async fn tags(&self) -> AppResult<Vec<String>> {
        self.queries().tags().await
    }

    async fn device_statuses(&self) -> AppResult<Vec<String>> {
        self.queries().device_statuses().await
    }
}
