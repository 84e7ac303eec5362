//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module.

pub mod create_admin;
pub mod jobs;
pub mod migrate;
pub mod serve;
