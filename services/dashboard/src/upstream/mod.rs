//! Access to the upstream event API.
//!
//! [`Upstream`] is the seam between the dashboard and the external service;
//! [`ApiClient`] is the HTTP implementation. Every call resolves to a
//! `Result` with a typed [`UpstreamError`], and every call is bounded by the
//! configured timeout.

mod client;
#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use async_trait::async_trait;
use eventdesk_model::{Event, ModelError, NewEvent, Profile};
use thiserror::Error;

use crate::session::SessionToken;

pub use client::ApiClient;

/// Errors returned by upstream calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream unreachable: {0}")]
    Network(String),

    #[error("upstream rejected the session token")]
    Unauthorized,

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed upstream response: {0}")]
    Decode(#[from] ModelError),

    #[error("invalid upstream url: {0}")]
    Url(String),
}

impl UpstreamError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Calls the dashboard makes against the event API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// `GET /auth/profile`: resolve the identity behind a session token.
    async fn profile(&self, token: &SessionToken) -> Result<Profile, UpstreamError>;

    /// `GET /event/{email}`: events visible to a user, in upstream order.
    async fn events_for(
        &self,
        token: &SessionToken,
        email: &str,
    ) -> Result<Vec<Event>, UpstreamError>;

    /// `GET /event/vendors/{email}`: display name of a vendor.
    async fn vendor_company_name(
        &self,
        token: &SessionToken,
        vendor_email: &str,
    ) -> Result<String, UpstreamError>;

    /// `POST /event/create`.
    async fn create_event(&self, token: &SessionToken, event: &NewEvent)
        -> Result<(), UpstreamError>;

    /// `PATCH /event/update/{id}` with the full record.
    async fn update_event(&self, token: &SessionToken, event: &Event) -> Result<(), UpstreamError>;

    /// Cheap reachability check used by readiness.
    async fn ping(&self) -> Result<(), UpstreamError>;
}
