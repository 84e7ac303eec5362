//! Cabinet persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use super::entities::{cabinet, cabinet_row, data_center, department, device, zone};
use super::resolver::Resolver;
use super::update_set::UpdateSet;
use crate::domain::cabinet::cabinet_label;
use crate::domain::{CabinetDetail, CabinetSummary, MapRect};
use crate::errors::{AppResult, DbResultExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A cabinet ready to insert, with every reference resolved to an id.
#[derive(Debug, Clone, PartialEq)]
pub struct CabinetRecord {
    pub location: String,
    pub location_sortable: String,
    pub data_center_id: i32,
    pub assigned_to: Option<i32>,
    pub zone_id: Option<i32>,
    pub cab_row_id: Option<i32>,
    pub cabinet_height: i32,
    pub u1_position: String,
    pub model: String,
    pub key_lock: String,
    pub max_kw: f64,
    pub max_weight: i32,
    pub installation_date: NaiveDate,
    pub notes: String,
    pub map: MapRect,
}

/// Resolved partial update. `None` leaves the column unchanged; for the
/// nullable references `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CabinetChanges {
    pub location: Option<String>,
    pub location_sortable: Option<String>,
    pub data_center_id: Option<i32>,
    pub assigned_to: Option<Option<i32>>,
    pub zone_id: Option<Option<i32>>,
    pub cab_row_id: Option<Option<i32>>,
    pub cabinet_height: Option<i32>,
    pub u1_position: Option<String>,
    pub model: Option<String>,
    pub key_lock: Option<String>,
    pub max_kw: Option<f64>,
    pub max_weight: Option<i32>,
    pub installation_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub map_x1: Option<i32>,
    pub map_x2: Option<i32>,
    pub map_y1: Option<i32>,
    pub map_y2: Option<i32>,
}

impl CabinetChanges {
    fn into_update_set(self) -> UpdateSet<cabinet::Entity> {
        use cabinet::Column;

        let mut set = UpdateSet::new();
        set.set_opt(Column::Location, self.location)
            .set_opt(Column::LocationSortable, self.location_sortable)
            .set_opt(Column::DataCenterId, self.data_center_id)
            .set_opt(Column::AssignedTo, self.assigned_to)
            .set_opt(Column::ZoneId, self.zone_id)
            .set_opt(Column::CabRowId, self.cab_row_id)
            .set_opt(Column::CabinetHeight, self.cabinet_height)
            .set_opt(Column::U1Position, self.u1_position)
            .set_opt(Column::Model, self.model)
            .set_opt(Column::KeyLock, self.key_lock)
            .set_opt(Column::MaxKw, self.max_kw)
            .set_opt(Column::MaxWeight, self.max_weight)
            .set_opt(Column::InstallationDate, self.installation_date)
            .set_opt(Column::Notes, self.notes)
            .set_opt(Column::MapX1, self.map_x1)
            .set_opt(Column::MapX2, self.map_x2)
            .set_opt(Column::MapY1, self.map_y1)
            .set_opt(Column::MapY2, self.map_y2);
        set
    }
}

/// Cabinet repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CabinetRepository: Send + Sync {
    /// Every cabinet with its data center name
    async fn list(&self) -> AppResult<Vec<CabinetSummary>>;

    /// Cabinets of a named data center as "id - location".
    /// NotFound if the data center does not exist.
    async fn list_by_data_center(&self, data_center: &str) -> AppResult<Vec<String>>;

    async fn find_detail(&self, id: i32) -> AppResult<Option<CabinetDetail>>;

    /// First cabinet (lowest id) at a location, across data centers
    async fn find_detail_by_location(&self, location: &str) -> AppResult<Option<CabinetDetail>>;
}

#[derive(Debug, FromQueryResult)]
struct CabinetDetailRow {
    id: i32,
    location: String,
    location_sortable: String,
    data_center: Option<String>,
    assigned_to: Option<String>,
    zone: Option<String>,
    cabinet_row: Option<String>,
    cabinet_height: i32,
    u1_position: String,
    model: String,
    key_lock: String,
    max_kw: f64,
    max_weight: i32,
    installation_date: NaiveDate,
    notes: String,
    map_x1: i32,
    map_x2: i32,
    map_y1: i32,
    map_y2: i32,
}

impl From<CabinetDetailRow> for CabinetDetail {
    fn from(row: CabinetDetailRow) -> Self {
        CabinetDetail {
            id: row.id,
            location: row.location,
            location_sortable: row.location_sortable,
            data_center: row.data_center,
            assigned_to: row.assigned_to,
            zone: row.zone,
            cabinet_row: row.cabinet_row,
            cabinet_height: row.cabinet_height,
            u1_position: row.u1_position,
            model: row.model,
            key_lock_info: row.key_lock,
            max_kw: row.max_kw,
            max_weight: row.max_weight,
            date_of_installation: row.installation_date,
            notes: row.notes,
            map_x1: row.map_x1,
            map_x2: row.map_x2,
            map_y1: row.map_y1,
            map_y2: row.map_y2,
        }
    }
}

/// Cabinet queries over any connection.
pub struct CabinetQueries<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> CabinetQueries<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    fn detail_query() -> Select<cabinet::Entity> {
        use cabinet::Column;

        cabinet::Entity::find()
            .select_only()
            .columns([
                Column::Id,
                Column::Location,
                Column::LocationSortable,
                Column::CabinetHeight,
                Column::U1Position,
                Column::Model,
                Column::KeyLock,
                Column::MaxKw,
                Column::MaxWeight,
                Column::InstallationDate,
                Column::Notes,
                Column::MapX1,
                Column::MapX2,
                Column::MapY1,
                Column::MapY2,
            ])
            .column_as(data_center::Column::Name, "data_center")
            .column_as(department::Column::Name, "assigned_to")
            .column_as(zone::Column::Description, "zone")
            .column_as(cabinet_row::Column::Name, "cabinet_row")
            .join(JoinType::LeftJoin, cabinet::Relation::DataCenter.def())
            .join(JoinType::LeftJoin, cabinet::Relation::Department.def())
            .join(JoinType::LeftJoin, cabinet::Relation::Zone.def())
            .join(JoinType::LeftJoin, cabinet::Relation::CabinetRow.def())
    }

    pub async fn list(&self) -> AppResult<Vec<CabinetSummary>> {
        let rows = cabinet::Entity::find()
            .select_only()
            .column(cabinet::Column::Id)
            .column(cabinet::Column::Location)
            .column_as(data_center::Column::Name, "data_center")
            .join(JoinType::InnerJoin, cabinet::Relation::DataCenter.def())
            .order_by_asc(data_center::Column::Name)
            .order_by_asc(cabinet::Column::Location)
            .into_tuple::<(i32, String, String)>()
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, location, data_center)| CabinetSummary {
                id,
                location,
                data_center,
            })
            .collect())
    }

    pub async fn list_by_data_center(&self, data_center: &str) -> AppResult<Vec<String>> {
        let data_center_id = Resolver::new(self.conn).data_center_id(data_center).await?;
        let rows = cabinet::Entity::find()
            .select_only()
            .column(cabinet::Column::Id)
            .column(cabinet::Column::Location)
            .filter(cabinet::Column::DataCenterId.eq(data_center_id))
            .order_by_asc(cabinet::Column::Location)
            .into_tuple::<(i32, String)>()
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, location)| cabinet_label(id, &location))
            .collect())
    }

    pub async fn find_detail(&self, id: i32) -> AppResult<Option<CabinetDetail>> {
        let row = Self::detail_query()
            .filter(cabinet::Column::Id.eq(id))
            .into_model::<CabinetDetailRow>()
            .one(self.conn)
            .await?;
        Ok(row.map(CabinetDetail::from))
    }

    pub async fn find_detail_by_location(&self, location: &str) -> AppResult<Option<CabinetDetail>> {
        let row = Self::detail_query()
            .filter(cabinet::Column::Location.eq(location))
            .order_by_asc(cabinet::Column::Id)
            .into_model::<CabinetDetailRow>()
            .one(self.conn)
            .await?;
        Ok(row.map(CabinetDetail::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let count = cabinet::Entity::find()
            .filter(cabinet::Column::Id.eq(id))
            .count(self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Whether another cabinet in the data center already uses `location`.
    pub async fn location_taken(
        &self,
        data_center_id: i32,
        location: &str,
        except_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = cabinet::Entity::find()
            .filter(cabinet::Column::DataCenterId.eq(data_center_id))
            .filter(cabinet::Column::Location.eq(location));
        if let Some(id) = except_id {
            query = query.filter(cabinet::Column::Id.ne(id));
        }
        Ok(query.count(self.conn).await? > 0)
    }

    /// Data center of an existing cabinet.
    pub async fn data_center_of(&self, id: i32) -> AppResult<Option<i32>> {
        Ok(cabinet::Entity::find_by_id(id)
            .select_only()
            .column(cabinet::Column::DataCenterId)
            .into_tuple::<i32>()
            .one(self.conn)
            .await?)
    }

    /// Insert a cabinet. Conflict if its location is taken in the data center.
    pub async fn insert(&self, record: CabinetRecord) -> AppResult<i32> {
        let what = format!("Cabinet '{}'", record.location);
        let model = cabinet::ActiveModel {
            location: Set(record.location),
            location_sortable: Set(record.location_sortable),
            data_center_id: Set(record.data_center_id),
            assigned_to: Set(record.assigned_to),
            zone_id: Set(record.zone_id),
            cab_row_id: Set(record.cab_row_id),
            cabinet_height: Set(record.cabinet_height),
            u1_position: Set(record.u1_position),
            model: Set(record.model),
            key_lock: Set(record.key_lock),
            max_kw: Set(record.max_kw),
            max_weight: Set(record.max_weight),
            installation_date: Set(record.installation_date),
            notes: Set(record.notes),
            map_x1: Set(record.map.x1),
            map_x2: Set(record.map.x2),
            map_y1: Set(record.map.y1),
            map_y2: Set(record.map.y2),
            ..Default::default()
        };
        let result = cabinet::Entity::insert(model)
            .exec(self.conn)
            .await
            .conflict_on_duplicate(what)?;
        Ok(result.last_insert_id)
    }

    /// Apply the supplied columns to one cabinet.
    pub async fn update(&self, id: i32, changes: CabinetChanges) -> AppResult<()> {
        changes
            .into_update_set()
            .exec(self.conn, cabinet::Column::Id.eq(id))
            .await
            .conflict_on_duplicate(format!("Cabinet location for cabinet {}", id))?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = cabinet::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn device_count(&self, id: i32) -> AppResult<u64> {
        Ok(device::Entity::find()
            .filter(device::Column::CabinetId.eq(id))
            .count(self.conn)
            .await?)
    }
}

/// Pool-backed CabinetRepository.
pub struct CabinetStore {
    db: DatabaseConnection,
}

impl CabinetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn queries(&self) -> CabinetQueries<'_, DatabaseConnection> {
        CabinetQueries::new(&self.db)
    }
}

#[async_trait]
impl CabinetRepository for CabinetStore {
    async fn list(&self) -> AppResult<Vec<CabinetSummary>> {
        self.queries().list().await
    }

    async fn list_by_data_center(&self, data_center: &str) -> AppResult<Vec<String>> {
        self.queries().list_by_data_center(data_center).await
    }

    async fn find_detail(&self, id: i32) -> AppResult<Option<CabinetDetail>> {
        self.queries().find_detail(id).await
    }

    async fn find_detail_by_location(&self, location: &str) -> AppResult<Option<CabinetDetail>> {
        self.queries().find_detail_by_location(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_render_only_supplied_columns() {
        let changes = CabinetChanges {
            model: Some("APC AR3100".to_string()),
            assigned_to: Some(None),
            ..CabinetChanges::default()
        };
        assert_eq!(changes.into_update_set().len(), 2);
        assert!(CabinetChanges::default().into_update_set().is_empty());
    }
}
