//! Record definitions for profiles and events.
//!
//! Field names follow the upstream's camelCase JSON. Legacy spellings the
//! upstream still emits (`_id`, `ProposedDate`) are accepted on ingress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::optional_date;

// =============================================================================
// Profile
// =============================================================================

/// Role of an authenticated user.
///
/// The upstream spells roles as free-form strings; anything other than `HR`
/// and `vendor` is kept verbatim as [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Hr,
    Vendor,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Hr => "HR",
            Role::Vendor => "vendor",
            Role::Other(role) => role,
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "HR" => Role::Hr,
            "vendor" => Role::Vendor,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attributes of the session's user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl Profile {
    /// Name used in greetings; falls back to "User" when no company is on file.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("User")
    }
}

/// Vendor lookup response (`GET /event/vendors/{email}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCompany {
    pub company_name: String,
}

// =============================================================================
// Event
// =============================================================================

/// Event resolution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Accept,
    Rejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Accept => "accept",
            EventStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A scheduling record between an HR requester and a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: EventId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,

    pub status: EventStatus,

    pub email_hr: String,

    pub email_vendor: String,

    /// Candidate dates in the order HR proposed them.
    #[serde(alias = "ProposedDate")]
    pub proposed_dates: Vec<DateTime<Utc>>,

    #[serde(default, with = "optional_date")]
    pub confirmed_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub remarks: String,
}

/// An event merged with its vendor's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub vendor_company_name: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_upstream_spelling() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"HR\"");
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");

        let other: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(other, Role::Other("auditor".to_string()));
        assert_eq!(other.to_string(), "auditor");
    }

    #[test]
    fn test_role_is_case_sensitive() {
        let role: Role = serde_json::from_str("\"hr\"").unwrap();
        assert_ne!(role, Role::Hr);
    }

    #[test]
    fn test_event_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Accept).unwrap(),
            "\"accept\""
        );
        assert_eq!(
            serde_json::to_string(&EventStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    #[test]
    fn test_event_accepts_legacy_field_names() {
        let json = r#"{
            "_id": "66b1f0",
            "name": "Health Talk",
            "dateCreated": "2024-08-01T09:30:00.000Z",
            "status": "pending",
            "emailHr": "hr@acme.test",
            "emailVendor": "sales@vendor.test",
            "ProposedDate": ["2024-09-01T00:00:00.000Z", "2024-09-02T00:00:00.000Z"],
            "confirmedDate": "",
            "postalCode": "123456",
            "address": "1 Main St",
            "remarks": "",
            "__v": 0
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id.as_str(), "66b1f0");
        assert_eq!(event.proposed_dates.len(), 2);
        assert_eq!(event.confirmed_date, None);
        assert!(event.date_created.is_some());
    }

    #[test]
    fn test_event_writes_absent_confirmed_date_as_empty_string() {
        let json = r#"{
            "id": "e1",
            "name": "Health Talk",
            "status": "rejected",
            "emailHr": "hr@acme.test",
            "emailVendor": "sales@vendor.test",
            "proposedDates": []
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["confirmedDate"], "");
        assert_eq!(value["proposedDates"], serde_json::json!([]));
        assert!(value.get("dateCreated").is_none());
    }

    #[test]
    fn test_enriched_event_flattens() {
        let json = r#"{
            "id": "e1",
            "name": "Health Talk",
            "status": "pending",
            "emailHr": "hr@acme.test",
            "emailVendor": "sales@vendor.test",
            "proposedDates": []
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        let enriched = EnrichedEvent {
            event,
            vendor_company_name: "Acme Co".to_string(),
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["vendorCompanyName"], "Acme Co");
        assert_eq!(value["name"], "Health Talk");
    }

    #[test]
    fn test_profile_display_name_fallback() {
        let profile: Profile =
            serde_json::from_str(r#"{"email":"hr@acme.test","role":"HR"}"#).unwrap();
        assert_eq!(profile.display_name(), "User");

        let profile: Profile = serde_json::from_str(
            r#"{"email":"hr@acme.test","role":"HR","companyName":"Acme"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "Acme");
    }
}
