//! Integration tests for destination folder resolution
//!
//! Verifies folder reuse, creation with `replace` conflict behavior,
//! OData escaping of folder names, and the failure modes around the
//! `Pictures` root.

use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use picrelay_graph::{ApiErrorKind, DriveError};

use crate::common;

/// Mounts the children filter query under the Pictures root
async fn mount_folder_lookup(server: &MockServer, folder_name: &str, found: Option<&str>) {
    let value = match found {
        Some(id) => serde_json::json!([{"id": id, "name": folder_name, "folder": {}}]),
        None => serde_json::json!([]),
    };

    Mock::given(method("GET"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .and(query_param(
            "$filter",
            format!("name eq '{folder_name}'").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": value,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_existing_folder_is_reused() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;
    mount_folder_lookup(&server, "team-photos", Some("folder-existing")).await;

    // Creation must never happen when the lookup finds the folder
    Mock::given(method("POST"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let folder_id = resolver
        .ensure_upload_folder(common::DRIVE_ID, Some("team-photos"))
        .await
        .expect("resolution failed");

    assert_eq!(folder_id, "folder-existing");
}

#[tokio::test]
async fn test_missing_folder_is_created_with_replace_behavior() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;
    mount_folder_lookup(&server, "fresh-folder", None).await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .and(body_json(serde_json::json!({
            "name": "fresh-folder",
            "folder": {},
            "@microsoft.graph.conflictBehavior": "replace",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "folder-created",
            "name": "fresh-folder",
            "folder": {"childCount": 0},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let reference = resolver
        .resolve_upload_folder(common::DRIVE_ID, Some("fresh-folder"))
        .await
        .expect("resolution failed");

    assert_eq!(reference.folder_id, "folder-created");
    assert_eq!(reference.name, "fresh-folder");
    assert_eq!(reference.drive_id, common::DRIVE_ID);
}

#[tokio::test]
async fn test_repeated_resolution_returns_same_folder() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;
    mount_folder_lookup(&server, "uploads", Some("folder-up")).await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let first = resolver
        .ensure_upload_folder(common::DRIVE_ID, None)
        .await
        .expect("first resolution failed");
    let second = resolver
        .ensure_upload_folder(common::DRIVE_ID, None)
        .await
        .expect("second resolution failed");

    assert_eq!(first, "folder-up");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_pictures_root_is_reported() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/drives/{}/root:/Pictures", common::DRIVE_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "itemNotFound", "message": "Item not found"},
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let error = resolver
        .ensure_upload_folder(common::DRIVE_ID, None)
        .await
        .unwrap_err();

    match error {
        DriveError::RootFolderMissing { drive_id } => {
            assert_eq!(drive_id, common::DRIVE_ID);
        }
        other => panic!("expected RootFolderMissing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_lookup_failure_propagates_without_creating() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"code": "generalException", "message": "Something went wrong"},
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let error = resolver
        .ensure_upload_folder(common::DRIVE_ID, Some("any"))
        .await
        .unwrap_err();

    match error {
        DriveError::Api(api) => {
            assert_eq!(api.status, 500);
            assert_eq!(api.kind, ApiErrorKind::Unknown);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_folder_names_with_quotes_are_escaped() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/drives/{}/items/{}/children",
            common::DRIVE_ID,
            common::PICTURES_ID
        )))
        .and(query_param("$filter", "name eq 'bob''s pics'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "folder-quoted", "name": "bob's pics", "folder": {}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let folder_id = resolver
        .ensure_upload_folder(common::DRIVE_ID, Some("bob's pics"))
        .await
        .expect("resolution failed");

    assert_eq!(folder_id, "folder-quoted");
}

#[tokio::test]
async fn test_default_folder_name_is_uploads() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;
    common::mount_pictures_root(&server).await;
    mount_folder_lookup(&server, "uploads", Some("folder-up")).await;

    let client = common::test_client(&server);
    let resolver = common::test_resolver(&client);

    let reference = resolver
        .resolve_upload_folder(common::DRIVE_ID, None)
        .await
        .expect("resolution failed");

    assert_eq!(reference.name, "uploads");
    assert_eq!(reference.folder_id, "folder-up");
}
