//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, MailQueue, RateLimitStore};
use crate::services::{
    AccountService, AuthService, CabinetService, DeviceService, ReferenceService, RequestService,
    ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pub reference_service: Arc<dyn ReferenceService>,
    pub cabinet_service: Arc<dyn CabinetService>,
    pub device_service: Arc<dyn DeviceService>,
    pub request_service: Arc<dyn RequestService>,
    /// Rate-limit counters
    pub cache: Arc<dyn RateLimitStore>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build every service over the database connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<dyn RateLimitStore>,
        mail: Arc<dyn MailQueue>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config, mail);
        Self::new(&container, cache, database)
    }

    /// Create application state from any service container.
    pub fn new(
        services: &dyn ServiceContainer,
        cache: Arc<dyn RateLimitStore>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            account_service: services.accounts(),
            reference_service: services.references(),
            cabinet_service: services.cabinets(),
            device_service: services.devices(),
            request_service: services.requests(),
            cache,
            database,
        }
    }
}
