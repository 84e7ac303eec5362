//! Device entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub label: String,
    pub serial_no: String,
    pub asset_tag: String,
    pub primary_ip: String,
    pub snmp_version: String,
    pub snmp_community: String,
    pub v3_security_level: String,
    pub v3_auth_protocol: String,
    pub v3_priv_protocol: String,
    pub hypervisor: String,
    pub owner: i32,
    pub primary_contact: i32,
    pub cabinet_id: i32,
    pub position: i32,
    pub height: i32,
    pub template_id: Option<i32>,
    pub weight: i32,
    pub nominal_watts: i32,
    pub power_supply_count: i32,
    pub ports: i32,
    pub chassis_slots: i32,
    pub rear_chassis_slots: i32,
    pub install_date: Date,
    pub status: String,
    pub half_depth: bool,
    pub back_side: bool,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::Owner",
        to = "super::department::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PrimaryContact",
        to = "super::person::Column::Id"
    )]
    PrimaryContact,
    #[sea_orm(
        belongs_to = "super::cabinet::Entity",
        from = "Column::CabinetId",
        to = "super::cabinet::Column::Id"
    )]
    Cabinet,
    #[sea_orm(
        belongs_to = "super::device_template::Entity",
        from = "Column::TemplateId",
        to = "super::device_template::Column::Id"
    )]
    Template,
}

impl Related<super::cabinet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cabinet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
