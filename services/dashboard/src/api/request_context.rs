//! Request-scoped context extracted from HTTP requests.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The request-id layer normally sets the header; fall back for handlers
        // mounted without it.
        let request_id = header_string(&parts.headers, REQUEST_ID_HEADER)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok(Self { request_id })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[tokio::test]
    async fn test_uses_request_id_header() {
        let (mut parts, _) = Request::builder()
            .header(REQUEST_ID_HEADER, "req-42")
            .body(())
            .unwrap()
            .into_parts();
        let ctx = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ctx.request_id, "req-42");
    }

    #[tokio::test]
    async fn test_generates_request_id_when_missing() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let ctx = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
    }
}
