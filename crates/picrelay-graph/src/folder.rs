//! Destination folder resolution
//!
//! Uploads land in a named folder directly under the drive's `Pictures`
//! root. The resolver looks the folder up by name and creates it when it
//! does not exist yet, so callers always get a usable folder id back.

use std::sync::Arc;

use picrelay_core::model::FolderReference;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::{decode, GraphClient};
use crate::{ApiErrorKind, DriveError};

/// Folder used when the caller does not name one
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

/// Fixed root all upload folders live under; never created by Picrelay
const ROOT_FOLDER: &str = "Pictures";

/// Minimal drive item shape used for folder lookups
#[derive(Debug, Deserialize)]
struct ItemRef {
    id: String,
}

/// Children collection returned by filter queries
#[derive(Debug, Deserialize)]
struct ChildList {
    #[serde(default)]
    value: Vec<ItemRef>,
}

// ============================================================================
// FolderResolver
// ============================================================================

/// Resolves and creates destination folders under the `Pictures` root
pub struct FolderResolver {
    client: Arc<GraphClient>,
}

impl FolderResolver {
    pub fn new(client: Arc<GraphClient>) -> Self {
        Self { client }
    }

    /// Returns the folder id for the named upload folder, creating the
    /// folder when it does not exist yet.
    ///
    /// # Arguments
    /// * `drive_id` - Drive to resolve against
    /// * `folder_name` - Folder under `Pictures`; defaults to
    ///   [`DEFAULT_UPLOAD_FOLDER`]
    pub async fn ensure_upload_folder(
        &self,
        drive_id: &str,
        folder_name: Option<&str>,
    ) -> Result<String, DriveError> {
        let reference = self.resolve_upload_folder(drive_id, folder_name).await?;
        Ok(reference.folder_id)
    }

    /// Like [`FolderResolver::ensure_upload_folder`] but returns the full
    /// folder reference
    pub async fn resolve_upload_folder(
        &self,
        drive_id: &str,
        folder_name: Option<&str>,
    ) -> Result<FolderReference, DriveError> {
        let name = folder_name.unwrap_or(DEFAULT_UPLOAD_FOLDER);
        let root_id = self.root_folder_id(drive_id).await?;

        if let Some(folder_id) = self.find_child_folder(drive_id, &root_id, name).await? {
            debug!(name, %folder_id, "Upload folder already exists");
            return Ok(FolderReference {
                drive_id: drive_id.to_string(),
                folder_id,
                name: name.to_string(),
            });
        }

        let folder_id = self.create_folder(drive_id, &root_id, name).await?;
        info!(name, %folder_id, "Created upload folder");

        Ok(FolderReference {
            drive_id: drive_id.to_string(),
            folder_id,
            name: name.to_string(),
        })
    }

    /// Creates a folder under the given parent and returns its id.
    ///
    /// Uses `replace` conflict behavior, so racing creations of the same
    /// name converge on one folder instead of producing `name 1` copies.
    pub async fn create_folder(
        &self,
        drive_id: &str,
        parent_folder_id: &str,
        name: &str,
    ) -> Result<String, DriveError> {
        let path = format!("/drives/{drive_id}/items/{parent_folder_id}/children");
        let body = json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "replace",
        });

        let value = self.client.post_json(&path, &body).await?;
        let item: ItemRef = decode(value, "folder creation response")?;
        Ok(item.id)
    }

    /// Resolves the id of the `Pictures` root folder
    async fn root_folder_id(&self, drive_id: &str) -> Result<String, DriveError> {
        let path = format!("/drives/{drive_id}/root:/{ROOT_FOLDER}");

        match self.client.get_json(&path).await {
            Ok(value) => {
                let item: ItemRef = decode(value, "Pictures folder lookup")?;
                Ok(item.id)
            }
            Err(DriveError::Api(api)) if api.kind == ApiErrorKind::NotFound => {
                Err(DriveError::RootFolderMissing {
                    drive_id: drive_id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Looks a child folder up by exact name.
    ///
    /// Lookup failures propagate; only an empty result set means the
    /// folder has to be created.
    async fn find_child_folder(
        &self,
        drive_id: &str,
        parent_id: &str,
        name: &str,
    ) -> Result<Option<String>, DriveError> {
        let path = format!(
            "/drives/{drive_id}/items/{parent_id}/children?$filter=name eq '{}'",
            escape_odata_literal(name)
        );

        let value = self.client.get_json(&path).await?;
        let children: ChildList = decode(value, "folder lookup response")?;
        Ok(children.value.into_iter().next().map(|item| item.id))
    }
}

/// Escapes a value for use inside an OData string literal; single quotes
/// are doubled per the OData grammar
fn escape_odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

// ============================================================================
// Tests
// ============================================================================
