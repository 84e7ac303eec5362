//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod cabinet;
pub mod cabinet_row;
pub mod data_center;
pub mod department;
pub mod device;
pub mod device_status;
pub mod device_template;
pub mod manufacturer;
pub mod person;
pub mod request;
pub mod tag;
pub mod user;
pub mod zone;
