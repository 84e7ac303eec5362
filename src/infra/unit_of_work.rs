//! Unit of Work: repository access plus transaction management.
//!
//! Pool-backed repositories serve single-statement reads. Anything that
//! writes more than one statement goes through [`UnitOfWork::transaction`],
//! where every query runs on the same transaction via [`TransactionContext`].

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    CabinetQueries, CabinetRepository, CabinetStore, DeviceQueries, DeviceRepository,
    DeviceStore, ReferenceRepository, ReferenceStore, RequestQueries, RequestRepository,
    RequestStore, Resolver, UserQueries, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic `transaction`; services are
/// generic over it instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn cabinets(&self) -> Arc<dyn CabinetRepository>;

    fn devices(&self) -> Arc<dyn DeviceRepository>;

    fn references(&self) -> Arc<dyn ReferenceRepository>;

    fn requests(&self) -> Arc<dyn RequestRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn resolver(&self) -> Resolver<'a, DatabaseTransaction> {
        Resolver::new(self.txn)
    }

    pub fn users(&self) -> UserQueries<'a, DatabaseTransaction> {
        UserQueries::new(self.txn)
    }

    pub fn cabinets(&self) -> CabinetQueries<'a, DatabaseTransaction> {
        CabinetQueries::new(self.txn)
    }

    pub fn devices(&self) -> DeviceQueries<'a, DatabaseTransaction> {
        DeviceQueries::new(self.txn)
    }

    pub fn requests(&self) -> RequestQueries<'a, DatabaseTransaction> {
        RequestQueries::new(self.txn)
    }

    /// Open a nested transaction (a savepoint) inside this one.
    pub async fn savepoint(&self) -> AppResult<Savepoint> {
        let txn = self.txn.begin().await?;
        Ok(Savepoint { txn })
    }
}

/// Nested transaction. Dropping it without commit rolls it back.
pub struct Savepoint {
    txn: DatabaseTransaction,
}

impl Savepoint {
    pub fn context(&self) -> TransactionContext<'_> {
        TransactionContext::new(&self.txn)
    }

    pub async fn commit(self) -> AppResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> AppResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    cabinet_repo: Arc<CabinetStore>,
    device_repo: Arc<DeviceStore>,
    reference_repo: Arc<ReferenceStore>,
    request_repo: Arc<RequestStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            cabinet_repo: Arc::new(CabinetStore::new(db.clone())),
            device_repo: Arc::new(DeviceStore::new(db.clone())),
            reference_repo: Arc::new(ReferenceStore::new(db.clone())),
            request_repo: Arc::new(RequestStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn cabinets(&self) -> Arc<dyn CabinetRepository> {
        self.cabinet_repo.clone()
    }

    fn devices(&self) -> Arc<dyn DeviceRepository> {
        self.device_repo.clone()
    }

    fn references(&self) -> Arc<dyn ReferenceRepository> {
        self.reference_repo.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.request_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
