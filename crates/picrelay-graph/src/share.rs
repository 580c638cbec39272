//! Anonymous share link creation

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{decode, GraphClient};
use crate::DriveError;

/// Permission resource returned by `createLink`
#[derive(Debug, Deserialize)]
struct PermissionResponse {
    link: Option<ShareLink>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareLink {
    web_url: Option<String>,
}

/// Creates an anonymous read-only view link for a drive item and returns
/// its URL
pub(crate) async fn create_view_link(
    client: &GraphClient,
    drive_id: &str,
    item_id: &str,
) -> Result<String, DriveError> {
    let path = format!("/drives/{drive_id}/items/{item_id}/createLink");
    let body = json!({
        "type": "view",
        "scope": "anonymous",
    });

    let value = client.post_json(&path, &body).await?;
    let permission: PermissionResponse = decode(value, "createLink response")?;

    let url = permission
        .link
        .and_then(|link| link.web_url)
        .ok_or_else(|| {
            DriveError::InvalidResponse("createLink response missing link.webUrl".to_string())
        })?;

    debug!(item_id, "Created anonymous view link");
    Ok(url)
}
