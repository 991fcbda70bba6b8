//! Event aggregation: a user's events enriched with vendor display names.
//!
//! One primary fetch lists the events, then one vendor lookup per event runs
//! concurrently. All lookups finish before the merged list is returned. A failed
//! lookup degrades that event's vendor name to [`UNKNOWN_VENDOR`]; a failed
//! primary fetch fails the whole aggregation.

use eventdesk_model::{EnrichedEvent, Event};
use futures_util::future::join_all;
use thiserror::Error;
use tracing::warn;

use crate::session::SessionContext;
use crate::upstream::{Upstream, UpstreamError};

/// Vendor name shown when the lookup fails.
pub const UNKNOWN_VENDOR: &str = "Unknown";

#[derive(Debug, Error)]
#[error("failed to fetch events for {email}: {source}")]
pub struct AggregationError {
    pub email: String,
    #[source]
    pub source: UpstreamError,
}

/// Fetch the session user's events and attach each vendor's company name.
///
/// The result keeps the upstream order.
pub async fn aggregate_events(
    upstream: &dyn Upstream,
    session: &SessionContext,
) -> Result<Vec<EnrichedEvent>, AggregationError> {
    let events = upstream
        .events_for(session.token(), session.email())
        .await
        .map_err(|source| AggregationError {
            email: session.email().to_string(),
            source,
        })?;

    let enriched = join_all(events.into_iter().map(|event| enrich(upstream, session, event))).await;
    Ok(enriched)
}

async fn enrich(upstream: &dyn Upstream, session: &SessionContext, event: Event) -> EnrichedEvent {
    let vendor_company_name = match upstream
        .vendor_company_name(session.token(), &event.email_vendor)
        .await
    {
        Ok(name) => name,
        Err(e) => {
            warn!(
                error = %e,
                event_id = %event.id,
                vendor_email = %event.email_vendor,
                "Failed to resolve vendor company name"
            );
            UNKNOWN_VENDOR.to_string()
        }
    };

    EnrichedEvent {
        event,
        vendor_company_name,
    }
}
