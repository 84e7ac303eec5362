//! Cabinet (equipment rack) types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::spreadsheet::DateInput;
use crate::utils::serde_ext::double_option;

/// Request body for creating a cabinet.
///
/// Foreign keys are given by natural key (data center name, department
/// name, zone description, row name) and resolved before the insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCabinet {
    #[validate(length(min = 1, max = 64, message = "location is required"))]
    #[schema(example = "A-01")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_sortable: Option<String>,
    #[validate(length(min = 1, message = "dataCenter is required"))]
    #[schema(example = "Colombo DC1")]
    pub data_center: String,
    /// Owning department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Network Operations")]
    pub assigned_to: Option<String>,
    /// Zone description, or "None" for no zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Hall A")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabinet_row: Option<String>,
    #[validate(range(min = 0, message = "cabinetHeight cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 42)]
    pub cabinet_height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u1_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_lock_info: Option<String>,
    #[validate(range(min = 0.0, message = "maxKW cannot be negative"))]
    #[serde(default, rename = "maxKW", skip_serializing_if = "Option::is_none")]
    pub max_kw: Option<f64>,
    #[validate(range(min = 0, message = "maxWeight cannot be negative"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<i32>,
    /// YYYY-MM-DD or a spreadsheet serial
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2024-03-01")]
    pub date_of_installation: Option<DateInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_x1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_x2: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_y1: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_y2: Option<i32>,
}

impl NewCabinet {
    /// Minimal cabinet with only the required fields.
    pub fn new(location: impl Into<String>, data_center: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            location_sortable: None,
            data_center: data_center.into(),
            assigned_to: None,
            zone: None,
            cabinet_row: None,
            cabinet_height: None,
            u1_position: None,
            model: None,
            key_lock_info: None,
            max_kw: None,
            max_weight: None,
            date_of_installation: None,
            notes: None,
            map_x1: None,
            map_x2: None,
            map_y1: None,
            map_y2: None,
        }
    }
}

/// Partial update. Absent fields are left unchanged.
///
/// `assignedTo` and `cabinetRow` may be set to `null` to clear them;
/// `zone` takes "None" for the same effect.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinetPatch {
    #[validate(length(min = 1, max = 64, message = "location cannot be empty"))]
    pub location: Option<String>,
    pub location_sortable: Option<String>,
    #[validate(length(min = 1, message = "dataCenter cannot be empty"))]
    pub data_center: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub assigned_to: Option<Option<String>>,
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cabinet_row: Option<Option<String>>,
    #[validate(range(min = 0, message = "cabinetHeight cannot be negative"))]
    pub cabinet_height: Option<i32>,
    pub u1_position: Option<String>,
    pub model: Option<String>,
    pub key_lock_info: Option<String>,
    #[validate(range(min = 0.0, message = "maxKW cannot be negative"))]
    #[serde(rename = "maxKW")]
    pub max_kw: Option<f64>,
    #[validate(range(min = 0, message = "maxWeight cannot be negative"))]
    pub max_weight: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub date_of_installation: Option<DateInput>,
    pub notes: Option<String>,
    pub map_x1: Option<i32>,
    pub map_x2: Option<i32>,
    pub map_y1: Option<i32>,
    pub map_y2: Option<i32>,
}

impl CabinetPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        *self == CabinetPatch::default()
    }
}

/// Row of the cabinet list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinetSummary {
    pub id: i32,
    pub location: String,
    pub data_center: String,
}

/// Denormalized cabinet view with referenced names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinetDetail {
    pub id: i32,
    pub location: String,
    pub location_sortable: String,
    pub data_center: Option<String>,
    pub assigned_to: Option<String>,
    pub zone: Option<String>,
    pub cabinet_row: Option<String>,
    pub cabinet_height: i32,
    pub u1_position: String,
    pub model: String,
    pub key_lock_info: String,
    #[serde(rename = "maxKW")]
    pub max_kw: f64,
    pub max_weight: i32,
    pub date_of_installation: NaiveDate,
    pub notes: String,
    pub map_x1: i32,
    pub map_x2: i32,
    pub map_y1: i32,
    pub map_y2: i32,
}

/// How a device names the cabinet it goes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CabinetRef {
    Id(i32),
    Location(String),
}

impl CabinetRef {
    /// Accepts the `"<id> - <location>"` form produced by the
    /// list-by-data-center endpoint, or a bare location.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let Some((head, _)) = value.split_once(" - ") {
            if let Ok(id) = head.trim().parse::<i32>() {
                return CabinetRef::Id(id);
            }
        }
        CabinetRef::Location(value.to_string())
    }
}

/// Entry of the list-by-data-center response.
pub fn cabinet_label(id: i32, location: &str) -> String {
    format!("{} - {}", id, location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cabinet_ref_parse() {
        assert_eq!(CabinetRef::parse("12 - A-01"), CabinetRef::Id(12));
        assert_eq!(CabinetRef::parse(" 7 - Row 3 - Left "), CabinetRef::Id(7));
        assert_eq!(
            CabinetRef::parse("A-01"),
            CabinetRef::Location("A-01".to_string())
        );
        assert_eq!(
            CabinetRef::parse("North - 2"),
            CabinetRef::Location("North - 2".to_string())
        );
    }

    #[test]
    fn test_cabinet_label_matches_parser() {
        let label = cabinet_label(31, "B-07");
        assert_eq!(label, "31 - B-07");
        assert_eq!(CabinetRef::parse(&label), CabinetRef::Id(31));
    }

    #[test]
    fn test_patch_emptiness() {
        let empty: CabinetPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());

        let clear_department: CabinetPatch =
            serde_json::from_str(r#"{"assignedTo":null}"#).unwrap();
        assert!(!clear_department.is_empty());
        assert_eq!(clear_department.assigned_to, Some(None));
    }

    #[test]
    fn test_new_cabinet_payload_names() {
        let body = r#"{
            "location": "A-01",
            "dataCenter": "DC1",
            "zone": "None",
            "maxKW": 7.5,
            "dateOfInstallation": 44562
        }"#;
        let cabinet: NewCabinet = serde_json::from_str(body).unwrap();
        assert_eq!(cabinet.max_kw, Some(7.5));
        assert_eq!(cabinet.date_of_installation, Some(DateInput::Serial(44562.0)));
        assert!(cabinet.validate().is_ok());

        let missing_location = NewCabinet::new("", "DC1");
        assert!(missing_location.validate().is_err());
    }
}
