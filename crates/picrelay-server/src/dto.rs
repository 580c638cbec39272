//! Request and response DTOs
//!
//! Successful responses wrap their payload in
//! `{"success": true, "data": ...}`; query parameters arrive camelCased
//! from the JavaScript clients this API grew up with.

use picrelay_core::model::FileRecord;
use serde::{Deserialize, Serialize};

/// Envelope for successful responses
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload for a completed image upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub web_url: String,
    pub share_url: String,
    pub file_name: String,
    /// Folder the file landed in; the default folder name when the
    /// request named none
    pub folder_name: String,
}

/// Payload for a full folder listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesData {
    pub files: Vec<FileRecord>,
    pub folder_name: String,
}

/// Query parameters for `GET /api/files`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub folder_name: Option<String>,
}

/// Query parameters for `GET /api/files/paginated`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedQuery {
    pub folder_name: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub page_token: Option<String>,
}

fn default_page_size() -> u32 {
    10
}
