//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work for repository access; every
//! multi-statement write runs inside one of its transactions.

mod account_service;
mod auth_service;
mod cabinet_service;
pub mod container;
mod device_service;
mod reference_service;
mod request_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use cabinet_service::{CabinetManager, CabinetService};
pub use device_service::{DeviceManager, DeviceService};
pub use reference_service::{ReferenceCatalog, ReferenceService};
pub use request_service::{ApprovalWorkflow, RequestService};
