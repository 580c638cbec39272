//! Integration tests for app-only token acquisition
//!
//! Verifies the client credentials exchange, token caching, collapsing of
//! concurrent refreshes, and the mapping of token endpoint failures.

use futures_util::future::join_all;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use picrelay_graph::{AuthRequestError, DriveError};

use crate::common;

#[tokio::test]
async fn test_token_request_sends_client_credentials_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client"))
        .and(body_string_contains("client_secret=test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": common::ACCESS_TOKEN,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);
    let token = manager.get_valid_token().await.expect("token request failed");

    assert_eq!(token.value, common::ACCESS_TOKEN);
    assert!(token.is_valid());
}

#[tokio::test]
async fn test_cached_token_is_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": common::ACCESS_TOKEN,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);

    let first = manager.get_valid_token().await.expect("first call failed");
    let second = manager.get_valid_token().await.expect("second call failed");

    assert_eq!(first.value, second.value);
    assert_eq!(first.expires_at, second.expires_at);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3600,
            "access_token": common::ACCESS_TOKEN,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);

    let calls = (0..8).map(|_| manager.get_valid_token());
    let results = join_all(calls).await;

    for result in results {
        let token = result.expect("concurrent token request failed");
        assert_eq!(token.value, common::ACCESS_TOKEN);
    }
}

#[tokio::test]
async fn test_token_inside_safety_margin_is_refreshed() {
    let server = MockServer::start().await;

    // expires_in equals the safety margin, so the stored token is already
    // stale and the second call must hit the endpoint again
    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 300,
            "access_token": common::ACCESS_TOKEN,
        })))
        .expect(2)
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);

    let first = manager.get_valid_token().await.expect("first call failed");
    assert!(!first.is_valid());

    manager.get_valid_token().await.expect("second call failed");
}

#[tokio::test]
async fn test_invalid_credentials_map_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided.",
        })))
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);
    let error = manager.get_valid_token().await.unwrap_err();

    assert!(matches!(
        error,
        DriveError::AuthRequest(AuthRequestError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_malformed_request_carries_provider_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_request",
            "error_description": "AADSTS90002: Tenant 'test-tenant' not found.",
        })))
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);
    let error = manager.get_valid_token().await.unwrap_err();

    match error {
        DriveError::AuthRequest(AuthRequestError::MalformedRequest(description)) => {
            assert!(description.contains("Tenant 'test-tenant' not found"));
        }
        other => panic!("expected MalformedRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_status_maps_to_other() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let manager = common::test_token_manager(&server);
    let error = manager.get_valid_token().await.unwrap_err();

    match error {
        DriveError::AuthRequest(AuthRequestError::Other {
            status,
            description,
        }) => {
            assert_eq!(status, 503);
            assert_eq!(description, "service unavailable");
        }
        other => panic!("expected Other, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_reflects_cached_token() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    let manager = common::test_token_manager(&server);

    manager.get_valid_token().await.expect("token request failed");
    let status = manager.status().await;

    assert!(status.has_token);
    assert!(status.is_valid);
    // One hour minus the five-minute safety margin
    let expires_in = status.expires_in.expect("expiry missing");
    assert!(expires_in > 3200 && expires_in <= 3300);
}
