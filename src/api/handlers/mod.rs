//! HTTP request handlers, one module per resource.

pub mod account_handler;
pub mod cabinet_handler;
pub mod device_handler;
pub mod reference_handler;
pub mod request_handler;
pub mod session_handler;

pub use account_handler::account_routes;
pub use cabinet_handler::cabinet_routes;
pub use device_handler::device_routes;
pub use reference_handler::reference_routes;
pub use request_handler::request_routes;
pub use session_handler::{login_routes, session_routes};
