//! Event creation: the form HR fills in and the payload sent upstream.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ModelError;
use crate::types::{EventStatus, Profile};
use crate::wire::optional_date;

/// Number of dates HR must propose when creating an event.
pub const PROPOSED_DATE_COUNT: usize = 3;

/// Values entered by HR when creating an event.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CreateEventForm {
    #[validate(length(min = 3, message = "Event name must be at least 3 characters"))]
    pub name: String,

    #[validate(length(equal = 3, message = "You must provide exactly 3 proposed dates"))]
    pub proposed_dates: Vec<DateTime<Utc>>,

    #[validate(length(min = 5, message = "Postal code is too short"))]
    pub postal_code: String,

    #[validate(length(min = 3, message = "Address is too short"))]
    pub address: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email_vendor: String,
}

impl CreateEventForm {
    /// Validate the form and shape the creation payload for `creator`.
    ///
    /// The status is always `pending`, `emailHr` is always the creator's
    /// email, and the confirmed date and remarks start out empty.
    pub fn into_new_event(self, creator: &Profile) -> Result<NewEvent, ModelError> {
        let form = self.normalized();
        form.validate()?;

        Ok(NewEvent {
            name: form.name,
            proposed_dates: form.proposed_dates,
            postal_code: form.postal_code,
            address: form.address,
            email_vendor: form.email_vendor,
            email_hr: creator.email.clone(),
            status: EventStatus::Pending,
            confirmed_date: None,
            remarks: String::new(),
        })
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            proposed_dates: self.proposed_dates,
            postal_code: self.postal_code.trim().to_string(),
            address: self.address.trim().to_string(),
            email_vendor: self.email_vendor.trim().to_string(),
        }
    }
}

/// Body of `POST /event/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub proposed_dates: Vec<DateTime<Utc>>,
    pub postal_code: String,
    pub address: String,
    pub email_vendor: String,
    pub email_hr: String,
    pub status: EventStatus,
    #[serde(default, with = "optional_date")]
    pub confirmed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remarks: String,
}

/// Parse a proposed date as entered in a form.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
/// Blank input yields `None`.
pub fn parse_proposed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
