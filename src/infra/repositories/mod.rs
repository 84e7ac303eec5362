//! Repository layer - Data access abstraction
//!
//! Each aggregate has a `*Queries` type that runs over any connection
//! (pool or transaction) and a pool-backed `*Store` implementing the
//! mockable repository trait.

pub(crate) mod entities;
mod cabinet_repository;
mod device_repository;
mod reference_repository;
mod request_repository;
mod resolver;
mod update_set;
mod user_repository;

pub use cabinet_repository::{
    CabinetChanges, CabinetQueries, CabinetRecord, CabinetRepository, CabinetStore,
};
pub use device_repository::{
    DeviceChanges, DeviceQueries, DeviceRecord, DeviceRepository, DeviceStore,
};
pub use reference_repository::{ReferenceQueries, ReferenceRepository, ReferenceStore};
pub use request_repository::{RequestQueries, RequestRepository, RequestStore};
pub use resolver::Resolver;
pub use update_set::UpdateSet;
pub use user_repository::{UserQueries, UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use cabinet_repository::MockCabinetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use device_repository::MockDeviceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reference_repository::MockReferenceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use request_repository::MockRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
