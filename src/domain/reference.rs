//! Reference data: zones, map placement and people.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ZONE_UNASSIGNED;

/// Rectangle on the data-center floor map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapRect {
    pub x1: i32,
    pub x2: i32,
    pub y1: i32,
    pub y2: i32,
}

impl MapRect {
    pub const ZERO: MapRect = MapRect {
        x1: 0,
        x2: 0,
        y1: 0,
        y2: 0,
    };

    /// Replace each corner the caller supplied, keep the rest.
    pub fn overridden_by(
        self,
        x1: Option<i32>,
        x2: Option<i32>,
        y1: Option<i32>,
        y2: Option<i32>,
    ) -> MapRect {
        MapRect {
            x1: x1.unwrap_or(self.x1),
            x2: x2.unwrap_or(self.x2),
            y1: y1.unwrap_or(self.y1),
            y2: y2.unwrap_or(self.y2),
        }
    }
}

/// A zone as stored, with the default map rectangle for its cabinets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: i32,
    pub description: String,
    pub map: MapRect,
}

/// Which zone a cabinet should be placed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneSelection {
    Unassigned,
    Named(String),
}

impl ZoneSelection {
    /// Absent, blank and `"None"` all mean "no zone".
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => ZoneSelection::Unassigned,
            Some(v) if v.eq_ignore_ascii_case(ZONE_UNASSIGNED) => ZoneSelection::Unassigned,
            Some(v) => ZoneSelection::Named(v.to_string()),
        }
    }
}

/// Extract the user id from a primary-contact string.
///
/// Accepts `"UserID, LastName"`, `"UserID LastName"` and a bare `"UserID"`.
pub fn contact_user_id(contact: &str) -> Option<&str> {
    contact
        .trim()
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .filter(|id| !id.is_empty())
}

/// Display form used by the people list.
pub fn format_contact(user_id: &str, last_name: &str) -> String {
    format!("{}, {}", user_id, last_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_sentinel() {
        assert_eq!(ZoneSelection::parse(None), ZoneSelection::Unassigned);
        assert_eq!(ZoneSelection::parse(Some("")), ZoneSelection::Unassigned);
        assert_eq!(ZoneSelection::parse(Some("None")), ZoneSelection::Unassigned);
        assert_eq!(ZoneSelection::parse(Some(" none ")), ZoneSelection::Unassigned);
        assert_eq!(
            ZoneSelection::parse(Some("Hall B")),
            ZoneSelection::Named("Hall B".to_string())
        );
    }

    #[test]
    fn test_contact_forms() {
        assert_eq!(contact_user_id("jdoe, Doe"), Some("jdoe"));
        assert_eq!(contact_user_id("jdoe Doe"), Some("jdoe"));
        assert_eq!(contact_user_id("  jdoe  "), Some("jdoe"));
        assert_eq!(contact_user_id("jdoe,Doe"), Some("jdoe"));
        assert_eq!(contact_user_id(""), None);
        assert_eq!(contact_user_id(", Doe"), None);
    }

    #[test]
    fn test_format_contact() {
        assert_eq!(format_contact("jdoe", "Doe"), "jdoe, Doe");
    }

    #[test]
    fn test_map_override() {
        let zone = MapRect {
            x1: 10,
            x2: 20,
            y1: 30,
            y2: 40,
        };
        let placed = zone.overridden_by(Some(11), None, None, Some(44));
        assert_eq!(
            placed,
            MapRect {
                x1: 11,
                x2: 20,
                y1: 30,
                y2: 44
            }
        );
    }
}
