//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Rate-limit counters (Redis)
//! - Mail queue and SMTP delivery
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod mail;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStore};
pub use db::{Database, Migrator};
pub use mail::{ApalisMailQueue, MailQueue, SmtpMailer};
pub use repositories::{
    CabinetRepository, DeviceRepository, ReferenceRepository, RequestRepository, UserRepository,
};
pub use unit_of_work::{Persistence, Savepoint, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimitStore;
#[cfg(any(test, feature = "test-utils"))]
pub use mail::MockMailQueue;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCabinetRepository, MockDeviceRepository, MockReferenceRepository, MockRequestRepository,
    MockUserRepository,
};
