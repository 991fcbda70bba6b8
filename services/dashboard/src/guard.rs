//! Route guard for the dashboard tree.
//!
//! Policy:
//! - every path under the protected prefix needs a session token that the
//!   upstream resolves to a profile; otherwise redirect to the landing page
//! - designated sub-paths additionally need a specific role; a mismatch
//!   redirects to the dashboard home
//! - everything else passes through untouched
//!
//! Resolution failures of any kind deny access (fail-closed) and are only
//! logged, never shown.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use eventdesk_model::Role;
use tracing::{debug, info, warn};

use crate::session::{SessionContext, SessionToken};
use crate::state::AppState;
use crate::upstream::Upstream;

/// A path prefix reserved for one role.
#[derive(Debug, Clone)]
pub struct RestrictedPath {
    pub prefix: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct GuardPolicy {
    /// Paths under this prefix require a valid session.
    pub protected_prefix: String,
    /// Where unauthenticated requests are sent.
    pub landing_path: String,
    /// Where authenticated requests lacking the required role are sent.
    pub home_path: String,
    pub restricted: Vec<RestrictedPath>,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            protected_prefix: "/dashboard".to_string(),
            landing_path: "/".to_string(),
            home_path: "/dashboard".to_string(),
            restricted: vec![RestrictedPath {
                prefix: "/dashboard/user/new".to_string(),
                role: Role::Hr,
            }],
        }
    }
}

/// Outcome of evaluating a request against the policy.
#[derive(Debug)]
pub enum GuardDecision {
    Allow(SessionContext),
    Redirect(String),
}

/// `path` equals `prefix` or continues it with a new segment.
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl GuardPolicy {
    pub fn is_protected(&self, path: &str) -> bool {
        under(path, &self.protected_prefix)
    }

    pub fn required_role(&self, path: &str) -> Option<&Role> {
        self.restricted
            .iter()
            .find(|r| under(path, &r.prefix))
            .map(|r| &r.role)
    }

    /// Decide whether a request for `path` carrying `token` may proceed.
    pub async fn evaluate(
        &self,
        upstream: &dyn Upstream,
        path: &str,
        token: Option<SessionToken>,
    ) -> GuardDecision {
        let Some(token) = token else {
            debug!(path = %path, "No session token, redirecting to landing");
            return GuardDecision::Redirect(self.landing_path.clone());
        };

        let profile = match upstream.profile(&token).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, path = %path, "Failed to resolve session profile");
                return GuardDecision::Redirect(self.landing_path.clone());
            }
        };

        if let Some(required) = self.required_role(path) {
            if &profile.role != required {
                info!(
                    path = %path,
                    role = %profile.role,
                    required = %required,
                    "Role not permitted on restricted path"
                );
                return GuardDecision::Redirect(self.home_path.clone());
            }
        }

        GuardDecision::Allow(SessionContext::new(token, profile))
    }
}

/// Middleware applying the guard policy to every request.
pub async fn route_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let policy = state.guard();
    let path = req.uri().path().to_string();
    if !policy.is_protected(&path) {
        return next.run(req).await;
    }

    let token = state.cookies().token_from_headers(req.headers());
    match policy.evaluate(state.upstream(), &path, token).await {
        GuardDecision::Allow(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        GuardDecision::Redirect(to) => Redirect::to(&to).into_response(),
    }
}
