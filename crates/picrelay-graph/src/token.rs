//! App-only OAuth2 token management
//!
//! Acquires access tokens from the Microsoft identity platform using the
//! client credentials grant and caches them until shortly before expiry.
//! The cache sits behind an async mutex that is held across a refresh, so
//! concurrent callers converge on a single token request instead of
//! hammering the endpoint.

use chrono::{DateTime, Duration, Utc};
use picrelay_core::config::GraphConfig;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{AuthRequestError, DriveError};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the Microsoft identity platform
const TOKEN_BASE_URL: &str = "https://login.microsoftonline.com";

/// Scope requesting every application permission granted to the app
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Seconds subtracted from `expires_in` when the expiry instant is
/// computed, so tokens are replaced before Graph starts rejecting them
const EXPIRY_SAFETY_MARGIN_SECS: i64 = 300;

// ============================================================================
// Token types
// ============================================================================

/// An app-only access token with its margin-adjusted expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Raw bearer token value
    pub value: String,
    /// Instant the token is treated as dead; the safety margin is already
    /// applied
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Returns true while the token is still usable
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }

    /// Returns true if the token expires within the given duration
    pub fn expires_within(&self, duration: Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

/// Diagnostic snapshot of the token cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    /// Whether a token has ever been acquired
    pub has_token: bool,
    /// Whether the cached token is still usable
    pub is_valid: bool,
    /// Whole seconds until the margin-adjusted expiry; `None` without a
    /// cached token, negative once it has passed
    pub expires_in: Option<i64>,
}

/// Successful token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Error body returned by the token endpoint
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error_description: Option<String>,
}

// ============================================================================
// TokenManager
// ============================================================================

/// Acquires and caches app-only access tokens for Microsoft Graph
pub struct TokenManager {
    client: reqwest::Client,
    config: GraphConfig,
    token_base_url: String,
    /// Cached token; the mutex is held across a refresh so concurrent
    /// callers queue behind the in-flight request
    cache: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    /// Creates a token manager for the given tenant and credentials
    pub fn new(config: GraphConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token_base_url: TOKEN_BASE_URL.to_string(),
            cache: Mutex::new(None),
        }
    }

    /// Overrides the identity platform base URL (useful for testing)
    pub fn with_token_url(mut self, base_url: impl Into<String>) -> Self {
        self.token_base_url = base_url.into();
        self
    }

    /// Returns a valid access token, refreshing the cache when needed.
    ///
    /// # Errors
    /// Returns [`DriveError::AuthConfig`] when credentials are missing and
    /// [`DriveError::AuthRequest`] when the token endpoint rejects the
    /// request or cannot be reached.
    pub async fn get_valid_token(&self) -> Result<AccessToken, DriveError> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.as_ref() {
            if token.is_valid() {
                debug!("Using cached access token");
                return Ok(token.clone());
            }
        }

        let token = self.request_token().await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    /// Reports on the cached token without triggering a refresh
    pub async fn status(&self) -> TokenStatus {
        let cache = self.cache.lock().await;
        match cache.as_ref() {
            Some(token) => TokenStatus {
                has_token: true,
                is_valid: token.is_valid(),
                expires_in: Some((token.expires_at - Utc::now()).num_seconds()),
            },
            None => TokenStatus {
                has_token: false,
                is_valid: false,
                expires_in: None,
            },
        }
    }

    /// Performs the client credentials exchange against the tenant's
    /// token endpoint
    async fn request_token(&self) -> Result<AccessToken, DriveError> {
        self.check_credentials()?;

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.token_base_url, self.config.tenant_id
        );
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        info!("Requesting new access token");

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token endpoint unreachable");
                AuthRequestError::Unreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let description = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "Token endpoint rejected the request");

            return Err(match status.as_u16() {
                401 => AuthRequestError::InvalidCredentials,
                400 => AuthRequestError::MalformedRequest(description),
                code => AuthRequestError::Other {
                    status: code,
                    description,
                },
            }
            .into());
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::InvalidResponse(format!("unreadable token response: {e}")))?;

        let expires_at =
            Utc::now() + Duration::seconds(body.expires_in - EXPIRY_SAFETY_MARGIN_SECS);
        info!(%expires_at, "Access token acquired");

        Ok(AccessToken {
            value: body.access_token,
            expires_at,
        })
    }

    /// Rejects token requests before they leave the process when a
    /// credential setting is empty
    fn check_credentials(&self) -> Result<(), DriveError> {
        let required = [
            ("client id", &self.config.client_id),
            ("client secret", &self.config.client_secret),
            ("tenant id", &self.config.tenant_id),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DriveError::AuthConfig(name.to_string()));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
