//! Approval requests and the changes they carry.
//!
//! A deferred add/delete/update is stored as a [`ProposedChange`] on the
//! request row. The approval email only points at the request; deciding
//! it applies the stored change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::cabinet::NewCabinet;
use super::device::{DevicePatch, NewDevice};
use crate::errors::{AppError, AppResult};

/// Lifecycle of an approval request: `Pending -> Approved | Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Parse the target of a decision. Only terminal states are accepted.
    pub fn parse_decision(value: &str) -> AppResult<Self> {
        let status: RequestStatus = value.parse()?;
        if !status.is_terminal() {
            return Err(AppError::validation(
                "A decision must be either Approved or Rejected",
            ));
        }
        Ok(status)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(AppError::validation(format!(
                "Unknown request status '{}'",
                value.trim()
            ))),
        }
    }
}

/// The change a request stands for, persisted as JSON on the request row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum ProposedChange {
    AddCabinet(NewCabinet),
    DeleteCabinet {
        #[serde(rename = "cabinetId")]
        cabinet_id: i32,
    },
    AddDevice(NewDevice),
    BulkImportDevices {
        devices: Vec<NewDevice>,
    },
    UpdateDevice {
        #[serde(rename = "deviceId")]
        device_id: i32,
        patch: DevicePatch,
    },
    DeleteDevice {
        #[serde(rename = "deviceId")]
        device_id: i32,
    },
}

impl ProposedChange {
    /// Stable name stored in the request's `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            ProposedChange::AddCabinet(_) => "addCabinet",
            ProposedChange::DeleteCabinet { .. } => "deleteCabinet",
            ProposedChange::AddDevice(_) => "addDevice",
            ProposedChange::BulkImportDevices { .. } => "bulkImportDevices",
            ProposedChange::UpdateDevice { .. } => "updateDevice",
            ProposedChange::DeleteDevice { .. } => "deleteDevice",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ProposedChange::AddCabinet(_) => "New Cabinet",
            ProposedChange::DeleteCabinet { .. } => "Cabinet Deletion",
            ProposedChange::AddDevice(_) => "New Device",
            ProposedChange::BulkImportDevices { .. } => "Bulk Device Import",
            ProposedChange::UpdateDevice { .. } => "Device Update",
            ProposedChange::DeleteDevice { .. } => "Device Deletion",
        }
    }

    /// Subject line of the approval email.
    pub fn subject(&self, request_id: i32) -> String {
        format!(
            "Approval Pending: {} (Request ID: {})",
            self.title(),
            request_id
        )
    }

    /// Front-end page that renders the approval window for this change.
    pub fn window_path(&self) -> &'static str {
        match self {
            ProposedChange::AddCabinet(_) => "/email/addCabinetWindow",
            ProposedChange::DeleteCabinet { .. } => "/email/deleteCabinetWindow",
            ProposedChange::AddDevice(_) => "/email/addNewDeviceWindow",
            ProposedChange::BulkImportDevices { .. } => "/email/bulkImportDevicesWindow",
            ProposedChange::UpdateDevice { .. } => "/email/updateDeviceWindow",
            ProposedChange::DeleteDevice { .. } => "/email/deleteDeviceWindow",
        }
    }

    /// The change flattened into query-string pairs.
    ///
    /// Nested values use bracketed keys: `devices[0][label]=sw1`.
    /// Null fields are omitted.
    pub fn link_pairs(&self) -> AppResult<Vec<(String, String)>> {
        let value = serde_json::to_value(self)
            .map_err(|e| AppError::internal(format!("Failed to encode change: {}", e)))?;
        let mut pairs = Vec::new();
        if let Some(data) = value.get("data") {
            flatten_into(&mut pairs, None, data);
        }
        Ok(pairs)
    }

    /// Validate every record the change would write.
    pub fn validate(&self) -> AppResult<()> {
        let check = |result: Result<(), validator::ValidationErrors>| {
            result.map_err(|e| AppError::validation(e.to_string()))
        };
        match self {
            ProposedChange::AddCabinet(cabinet) => check(cabinet.validate()),
            ProposedChange::AddDevice(device) => check(device.validate()),
            ProposedChange::BulkImportDevices { devices } => {
                if devices.is_empty() {
                    return Err(AppError::validation("At least one device is required"));
                }
                devices.iter().try_for_each(|d| check(d.validate()))
            }
            ProposedChange::UpdateDevice { patch, .. } => {
                if patch.is_empty() {
                    return Err(AppError::validation("No fields to update"));
                }
                check(patch.validate())
            }
            ProposedChange::DeleteCabinet { .. } | ProposedChange::DeleteDevice { .. } => Ok(()),
        }
    }
}

fn flatten_into(pairs: &mut Vec<(String, String)>, prefix: Option<&str>, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                let key = match prefix {
                    Some(prefix) => format!("{}[{}]", prefix, key),
                    None => key.clone(),
                };
                flatten_into(pairs, Some(&key), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                let key = format!("{}[{}]", prefix.unwrap_or_default(), index);
                flatten_into(pairs, Some(&key), nested);
            }
        }
        Value::String(text) => pairs.push((prefix.unwrap_or_default().to_string(), text.clone())),
        scalar => pairs.push((prefix.unwrap_or_default().to_string(), scalar.to_string())),
    }
}

/// Link to the approval window: `{base}{path}?requestID=N&<change pairs>`.
pub fn approval_link(base_url: &str, request_id: i32, change: &ProposedChange) -> AppResult<String> {
    let mut pairs = vec![("requestID".to_string(), request_id.to_string())];
    pairs.extend(change.link_pairs()?);
    let query = serde_urlencoded::to_string(&pairs)
        .map_err(|e| AppError::internal(format!("Failed to encode approval link: {}", e)))?;
    Ok(format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        change.window_path(),
        query
    ))
}

/// HTML body of the approval email.
pub fn approval_body(requested_by: &str, change: &ProposedChange, link: &str) -> String {
    format!(
        "<p>{} submitted a request: <strong>{}</strong>.</p>\
         <p><a href=\"{}\">Review the request</a></p>",
        escape_html(requested_by),
        change.title(),
        escape_html(link)
    )
}

/// Subject and HTML body of the decision notice sent to the requester.
pub fn decision_notice(request_id: i32, kind: &str, status: RequestStatus) -> (String, String) {
    let subject = format!("Request {} {}", request_id, status);
    let body = format!(
        "<p>Your request <strong>#{}</strong> ({}) was <strong>{}</strong>.</p>",
        request_id,
        escape_html(kind),
        status
    );
    (subject, body)
}

/// Escape text interpolated into mail HTML.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A stored approval request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub status: RequestStatus,
    #[schema(example = "addCabinet")]
    pub kind: String,
    pub requested_by: String,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    /// The proposed change as `{"action": ..., "data": ...}`
    #[schema(value_type = Object)]
    pub change: Value,
}

impl ApprovalRequest {
    /// Decode the stored change.
    pub fn proposed_change(&self) -> AppResult<ProposedChange> {
        serde_json::from_value(self.change.clone())
            .map_err(|e| AppError::internal(format!("Corrupt request payload {}: {}", self.id, e)))
    }
}

/// Response to a submitted approval request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRequest {
    #[serde(rename = "requestID")]
    pub request_id: i32,
    pub status: RequestStatus,
}

/// Body of `POST /requests/{id}/decision`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DecisionRequest {
    /// `Approved` or `Rejected`
    #[validate(length(min = 1, message = "status is required"))]
    #[schema(example = "Approved")]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_is_closed() {
        assert_eq!("Approved".parse::<RequestStatus>().unwrap(), RequestStatus::Approved);
        assert_eq!("rejected".parse::<RequestStatus>().unwrap(), RequestStatus::Rejected);
        assert!(matches!(
            "Done".parse::<RequestStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_decision_must_be_terminal() {
        assert!(RequestStatus::parse_decision("Approved").is_ok());
        assert!(RequestStatus::parse_decision("Pending").is_err());
        assert!(RequestStatus::parse_decision("maybe").is_err());
    }

    #[test]
    fn test_change_is_tagged() {
        let change = ProposedChange::DeleteCabinet { cabinet_id: 4 };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["action"], "deleteCabinet");
        assert_eq!(json["data"]["cabinetId"], 4);

        let decoded: ProposedChange = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, change);
    }

    #[test]
    fn test_bulk_link_uses_indexed_keys() {
        let change = ProposedChange::BulkImportDevices {
            devices: vec![
                NewDevice::new("sw1", "Network", "jdoe", "DC1", "A-01"),
                NewDevice::new("sw2", "Network", "jdoe", "DC1", "A-02"),
            ],
        };
        let pairs = change.link_pairs().unwrap();
        assert!(pairs.contains(&("devices[0][label]".to_string(), "sw1".to_string())));
        assert!(pairs.contains(&("devices[1][cabinet]".to_string(), "A-02".to_string())));
        assert!(pairs.iter().all(|(k, _)| !k.ends_with("[model]")));
    }

    #[test]
    fn test_approval_link() {
        let change = ProposedChange::AddCabinet(NewCabinet::new("A 01", "DC1"));
        let link = approval_link("https://dcim.example.com/", 17, &change).unwrap();
        assert!(link.starts_with("https://dcim.example.com/email/addCabinetWindow?requestID=17&"));
        assert!(link.contains("location=A+01"));
        assert!(link.contains("dataCenter=DC1"));
    }

    #[test]
    fn test_subjects() {
        let change = ProposedChange::DeleteDevice { device_id: 9 };
        assert_eq!(
            change.subject(3),
            "Approval Pending: Device Deletion (Request ID: 3)"
        );
        let (subject, _) = decision_notice(3, change.kind(), RequestStatus::Rejected);
        assert_eq!(subject, "Request 3 Rejected");
    }

    #[test]
    fn test_mail_html_escapes_user_text() {
        let change = ProposedChange::DeleteCabinet { cabinet_id: 4 };
        let requester = r#"<a href="http://evil.example">APPROVE HERE</a>"#;
        let body = approval_body(requester, &change, "https://dcim.example.com/x?a=1&b=2");

        assert!(!body.contains(requester));
        assert!(body.contains("&lt;a href=&quot;http://evil.example&quot;&gt;APPROVE HERE&lt;/a&gt;"));
        assert!(body.contains(r#"href="https://dcim.example.com/x?a=1&amp;b=2""#));

        let (_, notice) = decision_notice(4, "<b>kind</b>", RequestStatus::Approved);
        assert!(notice.contains("(&lt;b&gt;kind&lt;/b&gt;)"));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let change = ProposedChange::UpdateDevice {
            device_id: 1,
            patch: DevicePatch::default(),
        };
        assert!(change.validate().is_err());
    }
}
