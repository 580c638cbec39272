//! Domain model for the Picrelay workflows
//!
//! These records cross the boundary between the Graph workflows and the
//! HTTP surface. File records keep Microsoft Graph's own field names on
//! the wire (`webUrl`, `createdDateTime`, ...) so API consumers see the
//! same shapes the provider uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved destination folder inside the drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderReference {
    /// Drive the folder belongs to
    pub drive_id: String,
    /// Item id of the folder
    pub folder_id: String,
    /// Folder name as it appears under the `Pictures` root
    pub name: String,
}

/// Outcome of a completed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Provider URL of the uploaded item
    pub web_url: String,
    /// Anonymous read-only share link
    pub share_url: String,
    /// Name the file was stored under
    pub file_name: String,
}

/// A single file in a folder listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Item id
    pub id: String,
    /// File name
    pub name: String,
    /// Provider URL of the item
    pub web_url: String,
    /// Anonymous read-only share link
    pub share_url: String,
    /// Size in bytes
    pub size: u64,
    /// Creation timestamp, when the provider reported one
    #[serde(
        rename = "createdDateTime",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp, when the provider reported one
    #[serde(
        rename = "lastModifiedDateTime",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub modified_at: Option<DateTime<Utc>>,
    /// Preferred thumbnail URL; serialized as an explicit `null` when the
    /// item has no thumbnails
    pub thumbnail_url: Option<String>,
}

/// One page of a folder listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePage {
    /// Files in this page, in provider order
    pub files: Vec<FileRecord>,
    /// Opaque token for the next page; absent on the last page
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_page_token: Option<String>,
}
