//! HTTP handlers, pages, and routing.

mod dashboard;
pub mod error;
mod events;
mod health;
mod landing;
pub mod request_context;
mod views;

use axum::{extract::Request, middleware, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;

use crate::guard;
use crate::state::AppState;
use request_context::REQUEST_ID_HEADER;

/// Create the router with all routes and middleware.
///
/// The guard runs for every request and only acts on protected paths.
pub fn create_router(state: AppState) -> Router {
    // Spans carry the path only; query strings and cookies stay out of logs.
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        info_span!(
            "http_request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
        )
    });

    Router::new()
        // Health endpoints (no session required)
        .merge(health::routes())
        .merge(landing::routes())
        // Session-guarded pages
        .merge(dashboard::routes())
        .merge(events::routes())
        // Middleware, innermost first
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        .layer(trace)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
