//! Reference-data lists used to fill the front end's pickers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Reference service trait for dependency injection.
#[async_trait]
pub trait ReferenceService: Send + Sync {
    async fn data_centers(&self) -> AppResult<Vec<String>>;

    async fn departments(&self) -> AppResult<Vec<String>>;

    async fn zones(&self) -> AppResult<Vec<String>>;

    async fn cabinet_rows(&self) -> AppResult<Vec<String>>;

    async fn manufacturers(&self) -> AppResult<Vec<String>>;

    async fn models(&self, manufacturer: &str) -> AppResult<Vec<String>>;

    async fn people(&self) -> AppResult<Vec<String>>;

    async fn tags(&self) -> AppResult<Vec<String>>;

    async fn device_statuses(&self) -> AppResult<Vec<String>>;
}

/// Concrete implementation of ReferenceService using Unit of Work.
pub struct ReferenceCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReferenceCatalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReferenceService for ReferenceCatalog<U> {
    async fn data_centers(&self) -> AppResult<Vec<String>> {
        self.uow.references().data_centers().await
    }

    async fn departments(&self) -> AppResult<Vec<String>> {
        self.uow.references().departments().await
    }

    async fn zones(&self) -> AppResult<Vec<String>> {
        self.uow.references().zones().await
    }

    async fn cabinet_rows(&self) -> AppResult<Vec<String>> {
        self.uow.references().cabinet_rows().await
    }

    async fn manufacturers(&self) -> AppResult<Vec<String>> {
        self.uow.references().manufacturers().await
    }

    async fn models(&self, manufacturer: &str) -> AppResult<Vec<String>> {
        self.uow
            .references()
            .models_by_manufacturer(manufacturer.trim())
            .await
    }

    async fn people(&self) -> AppResult<Vec<String>> {
        self.uow.references().people().await
    }

    async fn tags(&self) -> AppResult<Vec<String>> {
        self.uow.references().tags().await
    }

    async fn device_statuses(&self) -> AppResult<Vec<String>> {
        self.uow.references().device_statuses().await
    }
}
