//! Session token transport and the per-request session context.
//!
//! The token lives in a single cookie. The guard reads it once, resolves the
//! profile, and attaches a [`SessionContext`] to the request; handlers take the
//! context as an extractor instead of re-reading cookies.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::Redirect;
use cookie::{Cookie, SameSite};
use eventdesk_model::{Profile, Role};

/// Opaque session credential. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token; blank tokens are treated as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Token and resolved profile of an authenticated request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: SessionToken,
    profile: Profile,
}

impl SessionContext {
    pub fn new(token: SessionToken, profile: Profile) -> Self {
        Self { token, profile }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn role(&self) -> &Role {
        &self.profile.role
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only the guard inserts a context; a handler reached without one is denied.
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| Redirect::to("/"))
    }
}

/// How the session cookie is named and flagged.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl CookieSettings {
    /// Read the session token from the request's `Cookie` headers.
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<SessionToken> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value).filter_map(Result::ok))
            .find(|c| c.name() == self.name)
            .and_then(|c| SessionToken::new(c.value()))
    }

    /// `Set-Cookie` value storing `token`.
    pub fn issue(&self, token: &SessionToken) -> String {
        Cookie::build((self.name.clone(), token.expose().to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
            .to_string()
    }

    /// `Set-Cookie` value clearing the session.
    pub fn clear(&self) -> String {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie.to_string()
    }
}
