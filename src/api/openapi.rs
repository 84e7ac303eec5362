//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, cabinet_handler, device_handler, reference_handler, request_handler,
    session_handler,
};
use crate::domain::{
    AccountView, ApprovalRequest, CabinetDetail, CabinetPatch, CabinetSummary, DecisionRequest,
    DeviceDetail, DevicePatch, EmailCredentialUpdate, EmailUpdate, ImportFailure, ImportReport,
    ImportedDevice, NewAccount, NewCabinet, NewDevice, PasswordChange, RenameAccount,
    RequestStatus, RoleUpdate, SubmittedRequest, UserRole,
};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, ResourceId};

/// OpenAPI documentation for the DCIM API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DCIM API",
        version = "0.1.0",
        description = "Data center inventory: cabinets, devices, reference data and approval requests"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        session_handler::login,
        session_handler::whoami,
        session_handler::logout,
        cabinet_handler::list_cabinets,
        cabinet_handler::list_cabinets_by_data_center,
        cabinet_handler::get_cabinet,
        cabinet_handler::get_cabinet_by_location,
        cabinet_handler::create_cabinet,
        cabinet_handler::update_cabinet,
        cabinet_handler::delete_cabinet,
        cabinet_handler::request_cabinet,
        cabinet_handler::request_cabinet_deletion,
        device_handler::list_device_statuses,
        device_handler::list_devices_by_cabinet,
        device_handler::get_device,
        device_handler::create_device,
        device_handler::bulk_import_devices,
        device_handler::update_device,
        device_handler::delete_device,
        device_handler::request_device,
        device_handler::request_bulk_import,
        device_handler::request_device_update,
        device_handler::request_device_deletion,
        request_handler::list_requests,
        request_handler::get_request,
        request_handler::decide_request,
        account_handler::list_accounts,
        account_handler::create_account,
        account_handler::get_account,
        account_handler::delete_account,
        account_handler::rename_account,
        account_handler::update_email,
        account_handler::update_role,
        account_handler::update_email_credential,
        account_handler::change_password,
        reference_handler::list_data_centers,
        reference_handler::list_departments,
        reference_handler::list_zones,
        reference_handler::list_cabinet_rows,
        reference_handler::list_manufacturers,
        reference_handler::list_models,
        reference_handler::list_people,
        reference_handler::list_tags,
    ),
    components(
        schemas(
            // Sessions and accounts
            session_handler::LoginRequest,
            TokenResponse,
            UserRole,
            AccountView,
            NewAccount,
            RenameAccount,
            EmailUpdate,
            RoleUpdate,
            EmailCredentialUpdate,
            PasswordChange,
            // Inventory
            NewCabinet,
            CabinetPatch,
            CabinetSummary,
            CabinetDetail,
            NewDevice,
            DevicePatch,
            DeviceDetail,
            device_handler::BulkImportRequest,
            ImportReport,
            ImportedDevice,
            ImportFailure,
            // Requests
            RequestStatus,
            ApprovalRequest,
            SubmittedRequest,
            DecisionRequest,
            // Shared
            ResourceId,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Sessions", description = "Login, logout and whoami"),
        (name = "Cabinets", description = "Equipment racks"),
        (name = "Devices", description = "Rack-mounted equipment"),
        (name = "Requests", description = "Changes waiting for Super-Admin approval"),
        (name = "Accounts", description = "User account management"),
        (name = "Reference data", description = "Lookup lists")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from POST /sessions"))
                        .build(),
                ),
            );
        }
    }
}
