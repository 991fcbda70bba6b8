//! In-memory upstream for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use eventdesk_model::{Event, EventId, EventStatus, NewEvent, Profile, Role};

use super::{Upstream, UpstreamError};
use crate::session::SessionToken;

#[derive(Default)]
pub(crate) struct FakeUpstream {
    profiles: HashMap<String, Profile>,
    events: HashMap<String, Vec<Event>>,
    vendors: HashMap<String, String>,
    events_down: bool,
    profile_timeout: bool,
    mutations_down: bool,
    pub vendor_lookups: AtomicUsize,
    pub created: Mutex<Vec<NewEvent>>,
    pub updated: Mutex<Vec<Event>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, token: &str, profile: Profile) -> Self {
        self.profiles.insert(token.to_string(), profile);
        self
    }

    pub fn with_events(mut self, email: &str, events: Vec<Event>) -> Self {
        self.events.insert(email.to_string(), events);
        self
    }

    pub fn with_vendor(mut self, email: &str, company: &str) -> Self {
        self.vendors.insert(email.to_string(), company.to_string());
        self
    }

    pub fn events_down(mut self) -> Self {
        self.events_down = true;
        self
    }

    pub fn profile_timeout(mut self) -> Self {
        self.profile_timeout = true;
        self
    }

    pub fn mutations_down(mut self) -> Self {
        self.mutations_down = true;
        self
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn profile(&self, token: &SessionToken) -> Result<Profile, UpstreamError> {
        if self.profile_timeout {
            return Err(UpstreamError::Timeout(Duration::from_millis(50)));
        }
        self.profiles
            .get(token.expose())
            .cloned()
            .ok_or(UpstreamError::Unauthorized)
    }

    async fn events_for(
        &self,
        _token: &SessionToken,
        email: &str,
    ) -> Result<Vec<Event>, UpstreamError> {
        if self.events_down {
            return Err(UpstreamError::Network("connection refused".to_string()));
        }
        Ok(self.events.get(email).cloned().unwrap_or_default())
    }

    async fn vendor_company_name(
        &self,
        _token: &SessionToken,
        vendor_email: &str,
    ) -> Result<String, UpstreamError> {
        self.vendor_lookups.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent lookups genuinely interleave.
        tokio::task::yield_now().await;
        self.vendors
            .get(vendor_email)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "vendor not found"))
    }

    async fn create_event(
        &self,
        _token: &SessionToken,
        event: &NewEvent,
    ) -> Result<(), UpstreamError> {
        if self.mutations_down {
            return Err(UpstreamError::status(500, "database unavailable"));
        }
        self.created.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn update_event(&self, _token: &SessionToken, event: &Event) -> Result<(), UpstreamError> {
        if self.mutations_down {
            return Err(UpstreamError::status(500, "database unavailable"));
        }
        self.updated.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), UpstreamError> {
        Ok(())
    }
}

pub(crate) fn profile(email: &str, role: Role) -> Profile {
    Profile {
        email: email.to_string(),
        role,
        company_name: Some("Acme".to_string()),
    }
}

pub(crate) fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, n, 0, 0, 0).unwrap()
}

pub(crate) fn pending_event(id: &str, vendor_email: &str) -> Event {
    Event {
        id: EventId::new(id),
        name: format!("Event {id}"),
        date_created: Some(day(1)),
        status: EventStatus::Pending,
        email_hr: "hr@acme.test".to_string(),
        email_vendor: vendor_email.to_string(),
        proposed_dates: vec![day(10), day(11), day(12)],
        confirmed_date: None,
        postal_code: "123456".to_string(),
        address: "1 Main St".to_string(),
        remarks: String::new(),
    }
}
