//! Dashboard page and its JSON counterpart.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use eventdesk_model::EnrichedEvent;
use serde::Deserialize;
use tracing::error;

use super::error::ApiError;
use super::request_context::RequestContext;
use super::views::{self, Notice};
use crate::aggregator::aggregate_events;
use crate::session::SessionContext;
use crate::state::AppState;
use crate::upstream::UpstreamError;

const LOAD_FAILED: &str = "Failed to load events. Please try again later.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/api/events", get(list_events))
}

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    notice: Option<String>,
    /// Case-insensitive filter on the event name.
    #[serde(default)]
    q: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Keep the events whose name contains `search`, ignoring case, in their original order.
pub(crate) fn filter_by_name(events: Vec<EnrichedEvent>, search: &str) -> Vec<EnrichedEvent> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return events;
    }
    events
        .into_iter()
        .filter(|row| row.event.name.to_lowercase().contains(&needle))
        .collect()
}

async fn dashboard(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let notice = query.notice.as_deref().and_then(Notice::from_flash);

    match aggregate_events(state.upstream(), &session).await {
        Ok(events) => {
            let events = filter_by_name(events, &query.q);
            Html(views::dashboard(
                session.profile(),
                Ok(events.as_slice()),
                &query.q,
                notice.as_ref(),
            ))
            .into_response()
        }
        Err(e) if matches!(e.source, UpstreamError::Unauthorized) => {
            Redirect::to(&state.guard().landing_path).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load dashboard events");
            (
                StatusCode::BAD_GATEWAY,
                Html(views::dashboard(
                    session.profile(),
                    Err(LOAD_FAILED),
                    &query.q,
                    notice.as_ref(),
                )),
            )
                .into_response()
        }
    }
}

/// The aggregated events as JSON, in upstream order, optionally filtered by `q`.
async fn list_events(
    State(state): State<AppState>,
    ctx: RequestContext,
    session: SessionContext,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<EnrichedEvent>>, ApiError> {
    aggregate_events(state.upstream(), &session)
        .await
        .map(|events| Json(filter_by_name(events, &query.q)))
        .map_err(|e| {
            error!(error = %e, request_id = %ctx.request_id, "Failed to list events");
            ApiError::from(e).with_request_id(ctx.request_id)
        })
}
