//! HTTP client for the upstream event API.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use eventdesk_model::{decode, Event, NewEvent, Profile, VendorCompany};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;

use super::{Upstream, UpstreamError};
use crate::session::SessionToken;

/// Longest upstream error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// API client for the upstream event service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url`; every call is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::Url(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::Url(format!(
                "{base_url}: cannot be used as a base url"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Build a URL from path segments; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request with the session token and return the success body.
    async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&SessionToken>,
    ) -> Result<Bytes, UpstreamError> {
        let mut request = request.timeout(self.timeout);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Unauthorized);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpstreamError::status(status.as_u16(), error_message(&body)))
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Upstream for ApiClient {
    async fn profile(&self, token: &SessionToken) -> Result<Profile, UpstreamError> {
        let url = self.url(&["auth", "profile"])?;
        let body = self.send(self.client.get(url), Some(token)).await?;
        Ok(decode(&body)?)
    }

    async fn events_for(
        &self,
        token: &SessionToken,
        email: &str,
    ) -> Result<Vec<Event>, UpstreamError> {
        let url = self.url(&["event", email])?;
        let body = self.send(self.client.get(url), Some(token)).await?;
        Ok(decode(&body)?)
    }

    async fn vendor_company_name(
        &self,
        token: &SessionToken,
        vendor_email: &str,
    ) -> Result<String, UpstreamError> {
        let url = self.url(&["event", "vendors", vendor_email])?;
        let body = self.send(self.client.get(url), Some(token)).await?;
        let vendor: VendorCompany = decode(&body)?;
        Ok(vendor.company_name)
    }

    async fn create_event(
        &self,
        token: &SessionToken,
        event: &NewEvent,
    ) -> Result<(), UpstreamError> {
        let url = self.url(&["event", "create"])?;
        self.send(self.client.post(url).json(event), Some(token)).await?;
        Ok(())
    }

    async fn update_event(&self, token: &SessionToken, event: &Event) -> Result<(), UpstreamError> {
        let url = self.url(&["event", "update", event.id.as_str()])?;
        self.send(self.client.patch(url).json(event), Some(token)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), UpstreamError> {
        // Any HTTP answer means the upstream is reachable.
        self.client
            .get(self.base_url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(())
    }
}

/// Upstream error body shapes seen in practice.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: serde_json::Value,
}

fn error_message(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return match parsed.message {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    text.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_url_building() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.url(&["event", "hr@acme.test"]).unwrap().as_str(),
            "http://localhost:3000/event/hr@acme.test"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let c = client("https://api.example.test/v2/");
        assert_eq!(
            c.url(&["auth", "profile"]).unwrap().as_str(),
            "https://api.example.test/v2/auth/profile"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.url(&["event", "a/b c"]).unwrap().as_str(),
            "http://localhost:3000/event/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:ops@acme.test", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(br#"{"message":"Event not found"}"#), "Event not found");
        assert_eq!(
            error_message(br#"{"message":["name too short"]}"#),
            r#"["name too short"]"#
        );
        assert_eq!(error_message(b"  "), "empty response body");
        assert_eq!(error_message(&[b'x'; 500]).len(), MAX_ERROR_BODY);
    }
}
