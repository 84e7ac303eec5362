//! Device (rack-mounted equipment) types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::spreadsheet::DateInput;
use crate::config::{DEFAULT_POWER_SUPPLY_COUNT, DEFAULT_SNMP_VERSION};

/// Request body for creating a device, also one row of a bulk import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_template_pair", skip_on_field_errors = false))]
pub struct NewDevice {
    #[validate(length(min = 1, max = 64, message = "label is required"))]
    #[schema(example = "core-sw-01")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(default, alias = "hostname", rename = "primaryIP", skip_serializing_if = "Option::is_none")]
    #[schema(example = "10.0.0.10")]
    pub primary_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snmp_community: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,
    /// Owning department name
    #[validate(length(min = 1, message = "owner is required"))]
    #[schema(example = "Network Operations")]
    pub owner: String,
    /// "UserID, LastName", "UserID LastName" or "UserID"
    #[validate(length(min = 1, message = "primaryContact is required"))]
    #[schema(example = "jdoe, Doe")]
    pub primary_contact: String,
    #[validate(length(min = 1, message = "dataCenter is required"))]
    #[schema(example = "Colombo DC1")]
    pub data_center: String,
    /// Cabinet location, or "<id> - <location>"
    #[validate(length(min = 1, message = "cabinet is required"))]
    #[schema(example = "A-01")]
    pub cabinet: String,
    #[validate(range(min = 0, message = "position cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// YYYY-MM-DD or a spreadsheet serial
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2022-01-01")]
    pub install_date: Option<DateInput>,
    #[serde(default, alias = "reservation", skip_serializing_if = "Option::is_none")]
    #[schema(example = "Production")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_depth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backside: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_template_pair(device: &NewDevice) -> Result<(), ValidationError> {
    template_pair_ok(device.manufacturer.as_deref(), device.model.as_deref())
}

fn template_pair_ok(manufacturer: Option<&str>, model: Option<&str>) -> Result<(), ValidationError> {
    let given = |v: Option<&str>| v.map_or(false, |s| !s.trim().is_empty());
    if given(manufacturer) != given(model) {
        let mut err = ValidationError::new("template");
        err.message = Some("manufacturer and model must be given together".into());
        return Err(err);
    }
    Ok(())
}

impl NewDevice {
    /// Device with only the required fields.
    pub fn new(
        label: impl Into<String>,
        owner: impl Into<String>,
        primary_contact: impl Into<String>,
        data_center: impl Into<String>,
        cabinet: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            serial_no: None,
            asset_tag: None,
            primary_ip: None,
            snmp_community: None,
            hypervisor: None,
            owner: owner.into(),
            primary_contact: primary_contact.into(),
            data_center: data_center.into(),
            cabinet: cabinet.into(),
            position: None,
            manufacturer: None,
            model: None,
            install_date: None,
            status: None,
            half_depth: None,
            backside: None,
            notes: None,
        }
    }

    /// Manufacturer and model when both are present and non-blank.
    pub fn template_key(&self) -> Option<(&str, &str)> {
        match (self.manufacturer.as_deref(), self.model.as_deref()) {
            (Some(m), Some(model)) if !m.trim().is_empty() && !model.trim().is_empty() => {
                Some((m.trim(), model.trim()))
            }
            _ => None,
        }
    }
}

/// Partial device update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_patch_template_pair", skip_on_field_errors = false))]
pub struct DevicePatch {
    #[validate(length(min = 1, max = 64, message = "label cannot be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[validate(range(min = 0, message = "position cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[validate(range(min = 0, message = "height cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, rename = "primaryIP", skip_serializing_if = "Option::is_none")]
    pub primary_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_depth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backside: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub install_date: Option<DateInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Department name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_patch_template_pair(patch: &DevicePatch) -> Result<(), ValidationError> {
    template_pair_ok(patch.manufacturer.as_deref(), patch.model.as_deref())
}

impl DevicePatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        *self == DevicePatch::default()
    }
}

/// Denormalized device view.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    pub id: i32,
    pub label: String,
    pub position: i32,
    pub height: i32,
    #[serde(rename = "primaryIP")]
    pub primary_ip: String,
    pub serial_no: String,
    pub asset_tag: String,
    pub half_depth: bool,
    pub backside: bool,
    pub hypervisor: String,
    pub install_date: NaiveDate,
    pub status: String,
    pub owner: Option<String>,
    /// "UserID LastName"
    pub primary_contact: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub cabinet_id: i32,
    pub cabinet: Option<String>,
    pub data_center: Option<String>,
    pub snmp_version: String,
    pub notes: String,
}

/// Physical and electrical defaults copied from a device template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub template_id: Option<i32>,
    pub height: i32,
    pub weight: i32,
    pub wattage: i32,
    pub power_supply_count: i32,
    pub ports: i32,
    pub chassis_slots: i32,
    pub rear_chassis_slots: i32,
    pub snmp_version: String,
}

impl Default for TemplateSpec {
    /// Specs for a device created without manufacturer and model.
    fn default() -> Self {
        Self {
            template_id: None,
            height: 0,
            weight: 0,
            wattage: 0,
            power_supply_count: DEFAULT_POWER_SUPPLY_COUNT,
            ports: 0,
            chassis_slots: 0,
            rear_chassis_slots: 0,
            snmp_version: DEFAULT_SNMP_VERSION.to_string(),
        }
    }
}

/// Outcome of a bulk import: rows are isolated from each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub succeeded: Vec<ImportedDevice>,
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportedDevice {
    /// Zero-based row index in the submitted batch
    pub index: usize,
    pub id: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// Entry of the devices-by-cabinet response.
pub fn device_label(id: i32, label: &str) -> String {
    format!("{} - {}", id, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let spec = TemplateSpec::default();
        assert_eq!(spec.snmp_version, "noAuthNoPriv");
        assert_eq!(spec.power_supply_count, 1);
        assert_eq!(spec.template_id, None);
        assert_eq!(spec.height, 0);
    }

    #[test]
    fn test_template_key_requires_both_parts() {
        let mut device = NewDevice::new("sw1", "Network", "jdoe", "DC1", "A-01");
        assert_eq!(device.template_key(), None);
        assert!(device.validate().is_ok());

        device.manufacturer = Some("Cisco".to_string());
        assert_eq!(device.template_key(), None);
        assert!(device.validate().is_err());

        device.model = Some("C9300".to_string());
        assert_eq!(device.template_key(), Some(("Cisco", "C9300")));
        assert!(device.validate().is_ok());
    }

    #[test]
    fn test_spreadsheet_row_aliases() {
        let row = r#"{
            "label": "srv-01",
            "hostname": "10.1.1.1",
            "owner": "Platform",
            "primaryContact": "jdoe, Doe",
            "dataCenter": "DC1",
            "cabinet": "4 - A-04",
            "installDate": 44562,
            "reservation": "Reserved"
        }"#;
        let device: NewDevice = serde_json::from_str(row).unwrap();
        assert_eq!(device.primary_ip.as_deref(), Some("10.1.1.1"));
        assert_eq!(device.status.as_deref(), Some("Reserved"));
        assert_eq!(device.install_date, Some(DateInput::Serial(44562.0)));
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(DevicePatch::default().is_empty());
        let patch = DevicePatch {
            label: Some("renamed".to_string()),
            ..DevicePatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_device_label() {
        assert_eq!(device_label(8, "fw-02"), "8 - fw-02");
    }
}
