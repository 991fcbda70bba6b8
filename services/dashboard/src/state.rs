//! Application state shared across request handlers.

use std::sync::Arc;

use crate::guard::GuardPolicy;
use crate::session::CookieSettings;
use crate::upstream::Upstream;

/// Shared application state.
///
/// This is passed to all request handlers and the route guard via Axum's
/// state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    upstream: Arc<dyn Upstream>,
    guard: GuardPolicy,
    cookies: CookieSettings,
}

impl AppState {
    pub fn new(upstream: Arc<dyn Upstream>, guard: GuardPolicy, cookies: CookieSettings) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                upstream,
                guard,
                cookies,
            }),
        }
    }

    /// Client for the upstream event API.
    pub fn upstream(&self) -> &dyn Upstream {
        self.inner.upstream.as_ref()
    }

    pub fn guard(&self) -> &GuardPolicy {
        &self.inner.guard
    }

    pub fn cookies(&self) -> &CookieSettings {
        &self.inner.cookies
    }
}
