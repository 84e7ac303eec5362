//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work and hands them out
//! as trait objects, so handlers never see a concrete implementation.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, ApprovalWorkflow, AuthService, Authenticator, CabinetManager,
    CabinetService, DeviceManager, DeviceService, ReferenceCatalog, ReferenceService,
    RequestService,
};
use crate::config::Config;
use crate::infra::{MailQueue, Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn references(&self) -> Arc<dyn ReferenceService>;

    fn cabinets(&self) -> Arc<dyn CabinetService>;

    fn devices(&self) -> Arc<dyn DeviceService>;

    fn requests(&self) -> Arc<dyn RequestService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    reference_service: Arc<dyn ReferenceService>,
    cabinet_service: Arc<dyn CabinetService>,
    device_service: Arc<dyn DeviceService>,
    request_service: Arc<dyn RequestService>,
}

impl Services {
    /// Create every service over the given Unit of Work
    pub fn with_unit_of_work<U: UnitOfWork>(
        uow: Arc<U>,
        config: Config,
        mail: Arc<dyn MailQueue>,
    ) -> Self {
        let approval_base_url = config.approval_base_url.clone();
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            reference_service: Arc::new(ReferenceCatalog::new(uow.clone())),
            cabinet_service: Arc::new(CabinetManager::new(uow.clone())),
            device_service: Arc::new(DeviceManager::new(uow.clone())),
            request_service: Arc::new(ApprovalWorkflow::new(uow, mail, approval_base_url)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        mail: Arc<dyn MailQueue>,
    ) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db)), config, mail)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn references(&self) -> Arc<dyn ReferenceService> {
        self.reference_service.clone()
    }

    fn cabinets(&self) -> Arc<dyn CabinetService> {
        self.cabinet_service.clone()
    }

    fn devices(&self) -> Arc<dyn DeviceService> {
        self.device_service.clone()
    }

    fn requests(&self) -> Arc<dyn RequestService> {
        self.request_service.clone()
    }
}
