//! Integration tests for drive discovery

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use picrelay_graph::{drives, ApiErrorKind, DriveError};

use crate::common;

#[tokio::test]
async fn test_list_drives_returns_summaries() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/drives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                {
                    "id": "drive-a",
                    "name": "Documents",
                    "driveType": "documentLibrary",
                    "webUrl": "https://contoso.example/drive-a",
                },
                {
                    "id": "drive-b",
                    "driveType": "business",
                },
            ],
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let drives = drives::list_drives(&client).await.expect("listing failed");

    assert_eq!(drives.len(), 2);
    assert_eq!(drives[0].id, "drive-a");
    assert_eq!(drives[0].name.as_deref(), Some("Documents"));
    assert_eq!(drives[1].id, "drive-b");
    assert!(drives[1].name.is_none());
}

#[tokio::test]
async fn test_drive_details_fetches_single_drive() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/drives/{}", common::DRIVE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": common::DRIVE_ID,
            "name": "Pictures Library",
            "driveType": "documentLibrary",
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let drive = drives::drive_details(&client, common::DRIVE_ID)
        .await
        .expect("details failed");

    assert_eq!(drive.id, common::DRIVE_ID);
    assert_eq!(drive.name.as_deref(), Some("Pictures Library"));
    assert_eq!(drive.drive_type.as_deref(), Some("documentLibrary"));
}

#[tokio::test]
async fn test_unknown_drive_maps_to_not_found() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/drives/no-such-drive"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "itemNotFound", "message": "The drive could not be found."},
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let error = drives::drive_details(&client, "no-such-drive")
        .await
        .unwrap_err();

    match error {
        DriveError::Api(api) => {
            assert_eq!(api.kind, ApiErrorKind::NotFound);
            assert_eq!(api.message, "The drive could not be found.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_permissions_map_to_forbidden() {
    let server = MockServer::start().await;
    common::mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/drives"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": "accessDenied", "message": "Insufficient privileges"},
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let error = drives::list_drives(&client).await.unwrap_err();

    match error {
        DriveError::Api(api) => assert_eq!(api.kind, ApiErrorKind::Forbidden),
        other => panic!("expected Api error, got {other:?}"),
    }
}
