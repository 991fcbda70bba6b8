//! Vendor responses to a proposed event.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ModelError;
use crate::types::{Event, EventStatus};

/// A vendor's answer to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Accept the event on one of its proposed dates.
    Accept { date: DateTime<Utc> },
    /// Reject the event, explaining why in the remarks.
    Reject { remarks: String },
}

impl Event {
    /// Accept on `date`, which must be one of the proposed dates.
    pub fn accept(&self, date: DateTime<Utc>) -> Result<Event, ModelError> {
        if !self.proposed_dates.contains(&date) {
            return Err(ModelError::DateNotProposed(
                date.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        Ok(Event {
            status: EventStatus::Accept,
            confirmed_date: Some(date),
            ..self.clone()
        })
    }

    /// Reject with `remarks`; blank remarks are refused.
    pub fn reject(&self, remarks: &str) -> Result<Event, ModelError> {
        let remarks = remarks.trim();
        if remarks.is_empty() {
            return Err(ModelError::RemarksRequired);
        }

        Ok(Event {
            status: EventStatus::Rejected,
            confirmed_date: None,
            remarks: remarks.to_string(),
            ..self.clone()
        })
    }

    /// Apply a vendor decision, returning the full record to send upstream.
    pub fn respond(&self, decision: &Decision) -> Result<Event, ModelError> {
        match decision {
            Decision::Accept { date } => self.accept(*date),
            Decision::Reject { remarks } => self.reject(remarks),
        }
    }
}
