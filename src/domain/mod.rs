//! Domain layer - inventory entities, approval requests and accounts.
//!
//! Types here are independent of storage and HTTP; they carry the
//! validation rules and value conversions shared by every service.

pub mod cabinet;
pub mod device;
pub mod password;
pub mod reference;
pub mod request;
pub mod spreadsheet;
pub mod user;

pub use cabinet::{CabinetDetail, CabinetPatch, CabinetRef, CabinetSummary, NewCabinet};
pub use device::{
    DeviceDetail, DevicePatch, ImportFailure, ImportReport, ImportedDevice, NewDevice,
    TemplateSpec,
};
pub use password::Password;
pub use reference::{MapRect, Zone, ZoneSelection};
pub use request::{
    ApprovalRequest, DecisionRequest, ProposedChange, RequestStatus, SubmittedRequest,
};
pub use spreadsheet::DateInput;
pub use user::{
    AccountView, EmailCredentialUpdate, EmailUpdate, NewAccount, PasswordChange, RenameAccount,
    RoleUpdate, User, UserRole,
};
