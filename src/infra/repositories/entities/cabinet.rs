//! Cabinet entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cabinets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
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
    pub installation_date: Date,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub map_x1: i32,
    pub map_x2: i32,
    pub map_y1: i32,
    pub map_y2: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_center::Entity",
        from = "Column::DataCenterId",
        to = "super::data_center::Column::Id"
    )]
    DataCenter,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::AssignedTo",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(
        belongs_to = "super::zone::Entity",
        from = "Column::ZoneId",
        to = "super::zone::Column::Id"
    )]
    Zone,
    #[sea_orm(
        belongs_to = "super::cabinet_row::Entity",
        from = "Column::CabRowId",
        to = "super::cabinet_row::Column::Id"
    )]
    CabinetRow,
}

impl Related<super::data_center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataCenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
