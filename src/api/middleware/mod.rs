//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, require_self_or_super_admin, require_super_admin, CurrentUser};
pub use rate_limit::{rate_limit_auth_middleware, rate_limit_middleware};
