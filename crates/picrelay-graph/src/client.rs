//! Authenticated JSON client for Microsoft Graph
//!
//! Every call obtains a valid token from the [`TokenManager`], attaches it
//! as a bearer header and normalizes the response: `204 No Content`
//! becomes JSON `null`, other success statuses are parsed as JSON, and
//! failure statuses are mapped to [`ApiError`] with the provider's own
//! error message when the body carries one.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::token::{AccessToken, TokenManager};
use crate::{ApiError, ApiErrorKind, DriveError};

/// Base URL for Microsoft Graph API v1.0
const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Error body shape Graph returns on non-success statuses
#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: Option<GraphErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    message: Option<String>,
}

// ============================================================================
// GraphClient
// ============================================================================

/// HTTP client for Microsoft Graph API operations
pub struct GraphClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenManager>,
}

impl GraphClient {
    /// Creates a client against the production Graph endpoint
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self::with_base_url(tokens, GRAPH_BASE_URL)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(tokens: Arc<TokenManager>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Performs an authenticated call against a Graph path.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path relative to the base URL, including any query string
    /// * `body` - Optional JSON request body
    ///
    /// # Returns
    /// The response body as JSON; `Value::Null` for `204 No Content`
    ///
    /// # Errors
    /// Token acquisition failures pass through unchanged; non-success
    /// statuses become [`DriveError::Api`].
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, DriveError> {
        let token = self.tokens.get_valid_token().await?;
        let url = self.url_for(path);
        debug!(%method, path, "Graph API call");

        let mut request = self.client.request(method, &url).bearer_auth(&token.value);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| DriveError::InvalidResponse(format!("unreadable body: {e}")));
        }

        let body_text = response.text().await.unwrap_or_default();
        let message = error_message(status, &body_text);
        warn!(status = status.as_u16(), path, %message, "Graph API call failed");

        Err(ApiError {
            status: status.as_u16(),
            kind: ApiErrorKind::from_status(status.as_u16()),
            message,
        }
        .into())
    }

    /// Authenticated GET returning the response JSON
    pub async fn get_json(&self, path: &str) -> Result<Value, DriveError> {
        self.call(Method::GET, path, None).await
    }

    /// Authenticated POST with a JSON body returning the response JSON
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, DriveError> {
        self.call(Method::POST, path, Some(body)).await
    }

    /// Raw HTTP client for requests that target absolute URLs, such as
    /// upload session transfers
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Valid bearer token for requests built outside [`GraphClient::call`]
    pub(crate) async fn bearer_token(&self) -> Result<AccessToken, DriveError> {
        self.tokens.get_valid_token().await
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Picks the most useful error message available: the Graph error body's
/// `error.message`, then the raw body, then the status reason
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<GraphErrorBody>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

/// Deserializes a Graph JSON value into a typed response
pub(crate) fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, DriveError> {
    serde_json::from_value(value)
        .map_err(|e| DriveError::InvalidResponse(format!("{context}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
