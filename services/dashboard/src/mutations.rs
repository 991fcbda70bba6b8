//! Event mutations: HR creates events, vendors accept or reject them.
//!
//! Both operations validate locally, send one write upstream, and leave
//! refreshing the view to the caller. Nothing is retried.

use eventdesk_model::{CreateEventForm, Decision, Event, EventId, ModelError, NewEvent, Role};
use thiserror::Error;
use tracing::info;

use crate::session::SessionContext;
use crate::upstream::{Upstream, UpstreamError};

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Invalid(#[from] ModelError),

    #[error("only {required} users can {action} events")]
    Forbidden {
        required: &'static str,
        action: &'static str,
    },

    #[error("event {0} was not found")]
    NotFound(EventId),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),
}

fn require_role(
    session: &SessionContext,
    role: Role,
    required: &'static str,
    action: &'static str,
) -> Result<(), MutationError> {
    if session.role() == &role {
        Ok(())
    } else {
        Err(MutationError::Forbidden { required, action })
    }
}

/// Validate `form` and create the event as the session's HR user.
pub async fn create_event(
    upstream: &dyn Upstream,
    session: &SessionContext,
    form: CreateEventForm,
) -> Result<NewEvent, MutationError> {
    require_role(session, Role::Hr, "HR", "create")?;

    let event = form.into_new_event(session.profile())?;
    upstream.create_event(session.token(), &event).await?;

    info!(
        email_hr = %event.email_hr,
        email_vendor = %event.email_vendor,
        "Event created"
    );
    Ok(event)
}

/// Look up one of the session user's events by id.
pub async fn find_event(
    upstream: &dyn Upstream,
    session: &SessionContext,
    id: &EventId,
) -> Result<Event, MutationError> {
    upstream
        .events_for(session.token(), session.email())
        .await?
        .into_iter()
        .find(|event| &event.id == id)
        .ok_or_else(|| MutationError::NotFound(id.clone()))
}

/// Load the event `id` and apply a vendor's decision to it.
pub async fn respond(
    upstream: &dyn Upstream,
    session: &SessionContext,
    id: &EventId,
    decision: &Decision,
) -> Result<Event, MutationError> {
    require_role(session, Role::Vendor, "vendor", "respond to")?;
    let event = find_event(upstream, session, id).await?;
    submit_response(upstream, session, &event, decision).await
}

/// Apply a vendor's decision to an already loaded event and send the full
/// record upstream.
pub async fn submit_response(
    upstream: &dyn Upstream,
    session: &SessionContext,
    event: &Event,
    decision: &Decision,
) -> Result<Event, MutationError> {
    require_role(session, Role::Vendor, "vendor", "respond to")?;

    let updated = event.respond(decision)?;
    upstream.update_event(session.token(), &updated).await?;

    info!(event_id = %updated.id, status = %updated.status, "Event updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use eventdesk_model::{parse_proposed_date, EventStatus};

    use super::*;
    use crate::session::SessionToken;
    use crate::upstream::fake::{day, pending_event, profile, FakeUpstream};

    fn hr() -> SessionContext {
        SessionContext::new(
            SessionToken::new("hr-token").unwrap(),
            profile("hr@acme.test", Role::Hr),
        )
    }

    fn vendor() -> SessionContext {
        SessionContext::new(
            SessionToken::new("vendor-token").unwrap(),
            profile("sales@vendor.test", Role::Vendor),
        )
    }

    fn form() -> CreateEventForm {
        CreateEventForm {
            name: "Health Talk".to_string(),
            proposed_dates: ["2024-10-01", "2024-10-02", "2024-10-03"]
                .iter()
                .filter_map(|d| parse_proposed_date(d))
                .collect(),
            postal_code: "123456".to_string(),
            address: "1 Main St".to_string(),
            email_vendor: "sales@vendor.test".to_string(),
        }
    }

    fn vendor_upstream() -> FakeUpstream {
        FakeUpstream::new().with_events(
            "sales@vendor.test",
            vec![
                pending_event("e1", "sales@vendor.test"),
                pending_event("e2", "sales@vendor.test"),
            ],
        )
    }

    #[tokio::test]
    async fn test_create_sends_pending_event_as_creator() {
        let upstream = FakeUpstream::new();
        let created = create_event(&upstream, &hr(), form()).await.unwrap();

        let sent = upstream.created.lock().unwrap().clone();
        assert_eq!(sent, vec![created.clone()]);
        assert_eq!(created.status, EventStatus::Pending);
        assert_eq!(created.email_hr, "hr@acme.test");
        assert_eq!(created.proposed_dates, form().proposed_dates);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_upstream() {
        let upstream = FakeUpstream::new();
        let mut bad = form();
        bad.postal_code = "12".to_string();

        let err = create_event(&upstream, &hr(), bad).await.unwrap_err();
        assert!(matches!(err, MutationError::Invalid(_)));
        assert!(upstream.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_hr_creates() {
        let upstream = FakeUpstream::new();
        let err = create_event(&upstream, &vendor(), form()).await.unwrap_err();
        assert!(matches!(err, MutationError::Forbidden { required: "HR", .. }));
    }

    #[tokio::test]
    async fn test_create_upstream_failure_is_reported() {
        let upstream = FakeUpstream::new().mutations_down();
        let err = create_event(&upstream, &hr(), form()).await.unwrap_err();
        assert!(matches!(
            err,
            MutationError::Upstream(UpstreamError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_accept_confirms_selected_date() {
        let upstream = vendor_upstream();
        let updated = respond(
            &upstream,
            &vendor(),
            &EventId::new("e2"),
            &Decision::Accept { date: day(11) },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, EventStatus::Accept);
        assert_eq!(updated.confirmed_date, Some(day(11)));
        let sent = upstream.updated.lock().unwrap().clone();
        assert_eq!(sent, vec![updated]);
    }

    #[tokio::test]
    async fn test_reject_requires_remarks() {
        let upstream = vendor_upstream();
        let err = respond(
            &upstream,
            &vendor(),
            &EventId::new("e1"),
            &Decision::Reject {
                remarks: " ".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            MutationError::Invalid(ModelError::RemarksRequired)
        ));
        assert!(upstream.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reject_clears_date() {
        let upstream = vendor_upstream();
        let updated = respond(
            &upstream,
            &vendor(),
            &EventId::new("e1"),
            &Decision::Reject {
                remarks: "Fully booked".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, EventStatus::Rejected);
        assert_eq!(updated.confirmed_date, None);
        assert_eq!(updated.remarks, "Fully booked");
    }

    #[tokio::test]
    async fn test_respond_unknown_event() {
        let upstream = vendor_upstream();
        let err = respond(
            &upstream,
            &vendor(),
            &EventId::new("missing"),
            &Decision::Accept { date: day(10) },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MutationError::NotFound(id) if id.as_str() == "missing"));
    }

    #[tokio::test]
    async fn test_submit_response_rejects_unproposed_date() {
        let upstream = vendor_upstream();
        let event = pending_event("e1", "sales@vendor.test");
        let err = submit_response(
            &upstream,
            &vendor(),
            &event,
            &Decision::Accept { date: day(20) },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            MutationError::Invalid(ModelError::DateNotProposed(_))
        ));
        assert!(upstream.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_vendors_respond() {
        let upstream = vendor_upstream();
        let err = respond(
            &upstream,
            &hr(),
            &EventId::new("e1"),
            &Decision::Accept { date: day(10) },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MutationError::Forbidden { required: "vendor", .. }));
    }
}
