//! Landing page and session cookie handling.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::views::{self, Notice};
use crate::session::SessionToken;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/session", post(sign_in))
        .route("/session/logout", post(sign_out))
}

#[derive(Debug, Deserialize)]
struct SignInForm {
    #[serde(default)]
    token: String,
}

async fn landing() -> Html<String> {
    Html(views::landing(None))
}

/// Store the pasted token in the session cookie.
///
/// The token is not checked here; the guard resolves it on the next request.
async fn sign_in(State(state): State<AppState>, Form(form): Form<SignInForm>) -> Response {
    let Some(token) = SessionToken::new(form.token) else {
        let notice = Notice::error("Enter a session token.");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::landing(Some(&notice))),
        )
            .into_response();
    };

    debug!("Session cookie issued");
    (
        [(SET_COOKIE, state.cookies().issue(&token))],
        Redirect::to("/dashboard"),
    )
        .into_response()
}

async fn sign_out(State(state): State<AppState>) -> Response {
    ([(SET_COOKIE, state.cookies().clear())], Redirect::to("/")).into_response()
}
