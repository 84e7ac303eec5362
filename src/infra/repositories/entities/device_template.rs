//! Device template entity: defaults for a manufacturer and model.

use sea_orm::entity::prelude::*;

use crate::domain::TemplateSpec;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "device_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub manufacturer_id: i32,
    pub model: String,
    pub height: i32,
    pub weight: i32,
    pub wattage: i32,
    pub ps_count: i32,
    pub num_ports: i32,
    pub chassis_slots: i32,
    pub rear_chassis_slots: i32,
    pub snmp_version: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::manufacturer::Entity",
        from = "Column::ManufacturerId",
        to = "super::manufacturer::Column::Id"
    )]
    Manufacturer,
}

impl Related<super::manufacturer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manufacturer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TemplateSpec {
    fn from(model: Model) -> Self {
        TemplateSpec {
            template_id: Some(model.id),
            height: model.height,
            weight: model.weight,
            wattage: model.wattage,
            power_supply_count: model.ps_count,
            ports: model.num_ports,
            chassis_slots: model.chassis_slots,
            rear_chassis_slots: model.rear_chassis_slots,
            snmp_version: model.snmp_version,
        }
    }
}
