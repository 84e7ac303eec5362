//! DCIM API - data center infrastructure management back end
//!
//! Cabinets, devices, their reference data, user accounts and an
//! approval workflow for changes that need a Super-Admin's sign-off.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Inventory entities, requests and accounts
//! - **services**: Use cases over the Unit of Work
//! - **infra**: Database, repositories, Redis and mail
//! - **jobs**: Background email delivery
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **utils**: Serde helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap the first Super-Admin
//! cargo run -- create-admin --user-id root --password 'change-me-now'
//!
//! # Deliver queued mail
//! cargo run -- jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
