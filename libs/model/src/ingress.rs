//! Decoding and checking of upstream responses.

use serde::de::DeserializeOwned;

use crate::error::ModelError;
use crate::types::{Event, EventStatus, Profile, VendorCompany};

/// A record that can be checked after it was decoded from an upstream response.
pub trait Ingress {
    fn check(&self) -> Result<(), ModelError>;
}

/// Decode an upstream body and check it before handing it to callers.
pub fn decode<T>(body: &[u8]) -> Result<T, ModelError>
where
    T: DeserializeOwned + Ingress,
{
    let value: T = serde_json::from_slice(body)?;
    value.check()?;
    Ok(value)
}

impl Ingress for Profile {
    fn check(&self) -> Result<(), ModelError> {
        if self.email.trim().is_empty() {
            return Err(ModelError::inconsistent("profile", "email is empty"));
        }
        Ok(())
    }
}

impl Ingress for VendorCompany {
    fn check(&self) -> Result<(), ModelError> {
        if self.company_name.trim().is_empty() {
            return Err(ModelError::inconsistent(
                "vendor",
                "company name is empty",
            ));
        }
        Ok(())
    }
}

impl Ingress for Event {
    fn check(&self) -> Result<(), ModelError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ModelError::inconsistent("event", "id is empty"));
        }

        match (self.status, self.confirmed_date) {
            (EventStatus::Accept, None) => Err(ModelError::inconsistent(
                "event",
                format!("{} is accepted without a confirmed date", self.id),
            )),
            (EventStatus::Accept, Some(date)) if !self.proposed_dates.contains(&date) => {
                Err(ModelError::inconsistent(
                    "event",
                    format!("{} confirmed a date that was never proposed", self.id),
                ))
            }
            (EventStatus::Rejected, Some(_)) => Err(ModelError::inconsistent(
                "event",
                format!("{} is rejected but still has a confirmed date", self.id),
            )),
            _ => Ok(()),
        }
    }
}

impl<T: Ingress> Ingress for Vec<T> {
    fn check(&self) -> Result<(), ModelError> {
        self.iter().try_for_each(Ingress::check)
    }
}
