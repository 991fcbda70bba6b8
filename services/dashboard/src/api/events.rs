//! Event pages: the HR create form, the detail dialog, and vendor responses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use eventdesk_model::{
    parse_proposed_date, CreateEventForm, Decision, Event, EventId, ModelError, Role,
};
use serde::Deserialize;
use tracing::warn;

use super::views::{self, DetailStep, Notice};
use crate::mutations::{self, MutationError};
use crate::session::SessionContext;
use crate::state::AppState;
use crate::upstream::UpstreamError;

const SERVICE_UNAVAILABLE: &str = "The event service is unavailable. Please try again.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/user/new", get(new_event).post(create_event))
        .route("/dashboard/events/{id}", get(event_detail))
        .route("/dashboard/events/{id}/accept", post(accept_event))
        .route("/dashboard/events/{id}/reject", post(reject_event))
}

/// Raw create form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateEventInput {
    pub name: String,
    pub proposed_date_1: String,
    pub proposed_date_2: String,
    pub proposed_date_3: String,
    pub postal_code: String,
    pub address: String,
    pub email_vendor: String,
}

impl CreateEventInput {
    pub fn proposed_dates(&self) -> [&str; 3] {
        [
            self.proposed_date_1.as_str(),
            self.proposed_date_2.as_str(),
            self.proposed_date_3.as_str(),
        ]
    }

    /// Blank or unreadable dates are dropped, so they fail the date count check.
    pub fn to_form(&self) -> CreateEventForm {
        CreateEventForm {
            name: self.name.clone(),
            proposed_dates: self
                .proposed_dates()
                .iter()
                .filter_map(|raw| parse_proposed_date(raw))
                .collect(),
            postal_code: self.postal_code.clone(),
            address: self.address.clone(),
            email_vendor: self.email_vendor.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DetailQuery {
    step: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AcceptInput {
    #[serde(default)]
    date: String,
}

#[derive(Debug, Deserialize)]
struct RejectInput {
    #[serde(default)]
    remarks: String,
}

fn can_respond(session: &SessionContext) -> bool {
    session.role() == &Role::Vendor
}

fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

/// Response for failures that leave nothing to re-render.
fn failure_page(state: &AppState, err: MutationError) -> Response {
    match err {
        MutationError::NotFound(id) => page(
            StatusCode::NOT_FOUND,
            views::error_page("Event not found", &format!("No event with id {id}.")),
        ),
        MutationError::Forbidden { .. } => Redirect::to("/dashboard?notice=forbidden").into_response(),
        MutationError::Upstream(UpstreamError::Unauthorized) => {
            Redirect::to(&state.guard().landing_path).into_response()
        }
        MutationError::Upstream(e) => {
            warn!(error = %e, "Event service call failed");
            page(
                StatusCode::BAD_GATEWAY,
                views::error_page("Service unavailable", SERVICE_UNAVAILABLE),
            )
        }
        MutationError::Invalid(e) => page(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::error_page("Invalid request", &e.to_string()),
        ),
    }
}

async fn new_event() -> Html<String> {
    Html(views::create_form(&CreateEventInput::default(), &[], None))
}

async fn create_event(
    State(state): State<AppState>,
    session: SessionContext,
    Form(input): Form<CreateEventInput>,
) -> Response {
    match mutations::create_event(state.upstream(), &session, input.to_form()).await {
        Ok(_) => Redirect::to("/dashboard?notice=created").into_response(),
        Err(MutationError::Invalid(e)) => {
            let notice = Notice::error("Please correct the highlighted fields.");
            page(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::create_form(&input, &e.field_errors(), Some(&notice)),
            )
        }
        Err(MutationError::Upstream(e)) if !matches!(e, UpstreamError::Unauthorized) => {
            warn!(error = %e, "Failed to create event");
            let notice = Notice::error(SERVICE_UNAVAILABLE);
            page(
                StatusCode::BAD_GATEWAY,
                views::create_form(&input, &[], Some(&notice)),
            )
        }
        Err(e) => failure_page(&state, e),
    }
}

async fn event_detail(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Response {
    let step = match query.step.as_deref() {
        Some("reject") => DetailStep::Reject,
        _ => DetailStep::Review,
    };

    match mutations::find_event(state.upstream(), &session, &EventId::new(id)).await {
        Ok(event) => page(
            StatusCode::OK,
            views::event_detail(&event, can_respond(&session), step, None, None),
        ),
        Err(e) => failure_page(&state, e),
    }
}

async fn accept_event(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Form(input): Form<AcceptInput>,
) -> Response {
    if !can_respond(&session) {
        return Redirect::to("/dashboard?notice=forbidden").into_response();
    }
    let event = match mutations::find_event(state.upstream(), &session, &EventId::new(id)).await {
        Ok(event) => event,
        Err(e) => return failure_page(&state, e),
    };

    let Some(date) = parse_proposed_date(&input.date) else {
        let notice = Notice::error("Select one of the proposed dates.");
        return page(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::event_detail(&event, true, DetailStep::Review, None, Some(&notice)),
        );
    };

    submit(&state, &session, &event, Decision::Accept { date }, DetailStep::Review).await
}

async fn reject_event(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    Form(input): Form<RejectInput>,
) -> Response {
    if !can_respond(&session) {
        return Redirect::to("/dashboard?notice=forbidden").into_response();
    }
    let event = match mutations::find_event(state.upstream(), &session, &EventId::new(id)).await {
        Ok(event) => event,
        Err(e) => return failure_page(&state, e),
    };

    let decision = Decision::Reject {
        remarks: input.remarks,
    };
    submit(&state, &session, &event, decision, DetailStep::Reject).await
}

/// Send the decision; on failure re-render the dialog with what was entered.
async fn submit(
    state: &AppState,
    session: &SessionContext,
    event: &Event,
    decision: Decision,
    step: DetailStep,
) -> Response {
    let rerender = |status: StatusCode, message: &str| {
        let notice = Notice::error(message);
        page(
            status,
            views::event_detail(event, true, step, Some(&decision), Some(&notice)),
        )
    };

    match mutations::submit_response(state.upstream(), session, event, &decision).await {
        Ok(_) => Redirect::to("/dashboard?notice=updated").into_response(),
        Err(MutationError::Invalid(e)) => {
            rerender(StatusCode::UNPROCESSABLE_ENTITY, &decision_message(&e))
        }
        Err(MutationError::Upstream(e)) if !matches!(e, UpstreamError::Unauthorized) => {
            warn!(error = %e, event_id = %event.id, "Failed to update event");
            rerender(StatusCode::BAD_GATEWAY, SERVICE_UNAVAILABLE)
        }
        Err(e) => failure_page(state, e),
    }
}

fn decision_message(err: &ModelError) -> String {
    match err {
        ModelError::DateNotProposed(_) => "Select one of the proposed dates.".to_string(),
        ModelError::RemarksRequired => "Remarks are required to reject an event.".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateEventInput {
        CreateEventInput {
            name: "Health Talk".to_string(),
            proposed_date_1: "2024-10-01".to_string(),
            proposed_date_2: "2024-10-02".to_string(),
            proposed_date_3: "2024-10-03".to_string(),
            postal_code: "123456".to_string(),
            address: "1 Main St".to_string(),
            email_vendor: "sales@vendor.test".to_string(),
        }
    }

    #[test]
    fn test_form_keeps_date_order() {
        let form = input().to_form();
        let days: Vec<String> = form
            .proposed_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(days, vec!["2024-10-01", "2024-10-02", "2024-10-03"]);
    }

    #[test]
    fn test_blank_dates_are_dropped() {
        let mut raw = input();
        raw.proposed_date_2 = "  ".to_string();
        raw.proposed_date_3 = "next tuesday".to_string();
        assert_eq!(raw.to_form().proposed_dates.len(), 1);
    }

    #[test]
    fn test_decision_messages() {
        assert_eq!(
            decision_message(&ModelError::RemarksRequired),
            "Remarks are required to reject an event."
        );
        assert_eq!(
            decision_message(&ModelError::DateNotProposed("2024-01-01".to_string())),
            "Select one of the proposed dates."
        );
    }
}
