//! File upload workflow
//!
//! Uploads go through an upload session: the session is created against
//! the destination folder, the file content is streamed to the session
//! URL with a single ranged PUT, and the finished item gets an anonymous
//! share link. Files of up to a few megabytes fit in one range, so no
//! chunk loop is needed.

use std::path::Path;
use std::sync::Arc;

use picrelay_core::model::UploadResult;
use serde::Deserialize;
use serde_json::json;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::client::{decode, GraphClient};
use crate::folder::FolderResolver;
use crate::{share, DriveError};

/// Response from `createUploadSession`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadSessionResponse {
    upload_url: String,
}

/// Drive item fields returned once the ranged PUT completes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedItem {
    id: String,
    web_url: String,
}

// ============================================================================
// UploadWorkflow
// ============================================================================

/// Uploads local files into a drive folder and shares them
pub struct UploadWorkflow {
    client: Arc<GraphClient>,
    folders: Arc<FolderResolver>,
}

impl UploadWorkflow {
    pub fn new(client: Arc<GraphClient>, folders: Arc<FolderResolver>) -> Self {
        Self { client, folders }
    }

    /// Resolves the destination folder and uploads into it.
    ///
    /// This is the composition the HTTP layer uses: `folder_name` comes
    /// straight from the request and defaults like the folder resolver
    /// does.
    pub async fn upload_image(
        &self,
        drive_id: &str,
        folder_name: Option<&str>,
        original_file_name: &str,
        local_path: &Path,
    ) -> Result<UploadResult, DriveError> {
        let folder_id = self
            .folders
            .ensure_upload_folder(drive_id, folder_name)
            .await?;
        self.upload(original_file_name, local_path, drive_id, &folder_id, None)
            .await
    }

    /// Uploads a local file into an already-resolved folder.
    ///
    /// The stored name combines the local file's base name (or
    /// `custom_file_name` when given) with the extension of the original
    /// upload name, so spooled files keep their random base while the
    /// caller's extension survives.
    ///
    /// # Errors
    /// Session creation, transfer and share link failures are reported as
    /// [`DriveError::SessionCreation`], [`DriveError::UploadTransfer`] and
    /// [`DriveError::ShareLink`] respectively.
    pub async fn upload(
        &self,
        original_file_name: &str,
        local_path: &Path,
        drive_id: &str,
        folder_id: &str,
        custom_file_name: Option<&str>,
    ) -> Result<UploadResult, DriveError> {
        let file_name = stored_file_name(original_file_name, local_path, custom_file_name);
        info!(%file_name, folder_id, "Uploading file");

        let session = self.create_session(drive_id, folder_id, &file_name).await?;
        let item = self.transfer(&session.upload_url, local_path).await?;

        let share_url = share::create_view_link(&self.client, drive_id, &item.id)
            .await
            .map_err(|e| DriveError::ShareLink {
                source: Box::new(e),
            })?;

        info!(%file_name, item_id = %item.id, "Upload completed");

        Ok(UploadResult {
            web_url: item.web_url,
            share_url,
            file_name,
        })
    }

    async fn create_session(
        &self,
        drive_id: &str,
        folder_id: &str,
        file_name: &str,
    ) -> Result<UploadSessionResponse, DriveError> {
        let path =
            format!("/drives/{drive_id}/items/{folder_id}:/{file_name}:/createUploadSession");

        let value = self
            .client
            .post_json(&path, &json!({}))
            .await
            .map_err(|e| DriveError::SessionCreation {
                source: Box::new(e),
            })?;

        decode(value, "upload session response")
    }

    /// Streams the file to the session URL in a single range
    async fn transfer(
        &self,
        upload_url: &str,
        local_path: &Path,
    ) -> Result<UploadedItem, DriveError> {
        let file = File::open(local_path).await.map_err(|e| {
            DriveError::UploadTransfer(format!("cannot open {}: {e}", local_path.display()))
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| DriveError::UploadTransfer(format!("cannot stat file: {e}")))?
            .len();

        debug!(size, "Streaming file to upload session");

        let token = self.client.bearer_token().await?;
        let response = self
            .client
            .http_client()
            .put(upload_url)
            .bearer_auth(&token.value)
            .header("Content-Length", size.to_string())
            .header("Content-Range", content_range(size))
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| DriveError::UploadTransfer(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::UploadTransfer(format!(
                "status {}: {body}",
                status.as_u16()
            )));
        }

        let value = response
            .json()
            .await
            .map_err(|e| DriveError::InvalidResponse(format!("unreadable upload response: {e}")))?;
        decode(value, "uploaded item")
    }
}

/// Derives the name a file is stored under.
///
/// The base comes from the local path (or the caller's custom name); the
/// extension is everything after the original name's last dot. A dotless
/// original contributes itself as the extension.
fn stored_file_name(
    original_file_name: &str,
    local_path: &Path,
    custom_file_name: Option<&str>,
) -> String {
    let extension = original_file_name
        .rsplit('.')
        .next()
        .unwrap_or(original_file_name);

    let base = match custom_file_name {
        Some(name) => name,
        None => local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file"),
    };

    format!("{base}.{extension}")
}

/// `Content-Range` header for a whole file sent as one range
fn content_range(size: u64) -> String {
    format!("bytes 0-{}/{}", size.saturating_sub(1), size)
}

// ============================================================================
// Tests
// ============================================================================
