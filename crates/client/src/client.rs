//! HTTP plumbing for the admin API.
//!
//! [`ApiClient`] owns one pooled `reqwest` client, the base URL and the
//! session store. Resource operations live in [`crate::resources`] as
//! further `impl ApiClient` blocks and go through the request helpers here,
//! so every call gets the same headers, bearer token and error mapping.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Request body variants.
pub(crate) enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Admin API client.
///
/// Cloning is cheap and shares the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new admin API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
            }),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session store consulted on every request.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Execute a GET request.
    pub(crate) async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.send(Method::GET, path, query, Body::Empty).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::POST, path, &[], json_body(body)?).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, &[], json_body(body)?).await
    }

    /// Execute a POST request with a multipart body.
    pub(crate) async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ApiError> {
        self.send(Method::POST, path, &[], Body::Multipart(form)).await
    }

    /// Execute a PUT request with a multipart body.
    pub(crate) async fn put_multipart(&self, path: &str, form: Form) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, &[], Body::Multipart(form)).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, &[], Body::Empty).await
    }

    /// Resolve `path` against the base URL and append `query`.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path, query)?;
        let mut request = self.inner.http.request(method, url);

        if let Some(session) = self.inner.session.current().await {
            request = request.header(reqwest::header::AUTHORIZATION, session.authorization());
        }

        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Admin API request failed to send");
            ApiError::Http(e)
        })?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(status = status.as_u16(), "Admin API request succeeded");
            return parse_body(&text);
        }

        Err(self.parse_error(status, &text).await)
    }

    /// Parse error response from the admin API.
    async fn parse_error(&self, status: StatusCode, text: &str) -> ApiError {
        let message = error_message(text);
        warn!(status = status.as_u16(), message = ?message, "Admin API returned an error");

        if status == StatusCode::UNAUTHORIZED {
            if self.inner.session.clear().await {
                warn!("Session expired, signed out");
            }
            return ApiError::Unauthorized { message };
        }

        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn json_body<B: Serialize>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|e| ApiError::Encode(e.to_string()))
}

/// Parse a success body. An empty body (e.g. 204) reads as `{}`.
fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(text)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")))
}

/// Extract `message` (or `error`) from a JSON error body.
fn error_message(text: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) else {
        return None;
    };
    ["message", "error"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::with_base_url(base).unwrap();
        ApiClient::new(&config, SessionStore::new()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_path_and_query() {
        let client = client("http://localhost:3000/api");
        let url = client
            .endpoint(
                "/admin/meals",
                &[("day", "Monday".to_string()), ("page", "2".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/admin/meals?day=Monday&page=2"
        );
    }

    #[test]
    fn test_endpoint_encodes_query_values() {
        let client = client("http://localhost:3000");
        let url = client
            .endpoint("admin/orders", &[("filter", "a&b c".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/admin/orders?filter=a%26b+c"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Location not found"}"#).as_deref(),
            Some("Location not found")
        );
        assert_eq!(
            error_message(r#"{"error":"Invalid token"}"#).as_deref(),
            Some("Invalid token")
        );
        assert_eq!(error_message(r#"{"message":""}"#), None);
        assert_eq!(error_message("<html>Bad gateway</html>"), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn test_empty_success_body_is_empty_object() {
        assert_eq!(parse_body("").unwrap(), serde_json::json!({}));
        assert!(parse_body("not json").is_err());
    }

    #[test]
    fn test_debug_shows_base_url() {
        let debug = format!("{:?}", client("http://localhost:3000"));
        assert!(debug.contains("http://localhost:3000/"));
    }
}
