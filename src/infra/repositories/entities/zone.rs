//! Zone entity with the default map rectangle for its cabinets.

use sea_orm::entity::prelude::*;

use crate::domain::{MapRect, Zone};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "zones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub map_x1: i32,
    pub map_x2: i32,
    pub map_y1: i32,
    pub map_y2: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Zone {
    fn from(model: Model) -> Self {
        Zone {
            id: model.id,
            description: model.description,
            map: MapRect {
                x1: model.map_x1,
                x2: model.map_x2,
                y1: model.map_y1,
                y2: model.map_y2,
            },
        }
    }
}
