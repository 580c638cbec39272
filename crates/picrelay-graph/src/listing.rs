//! Folder listing workflow
//!
//! Lists folder children with their thumbnails expanded and decorates
//! every item with an anonymous share link. Pagination follows Graph's
//! `$top`/`$skiptoken` scheme; the opaque token travels to the API
//! consumer and comes back unchanged for the next page.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use picrelay_core::model::{FilePage, FileRecord};
use serde::Deserialize;
use tracing::debug;

use crate::client::{decode, GraphClient};
use crate::folder::FolderResolver;
use crate::{share, DriveError};

/// Marker splitting a `@odata.nextLink` URL from its continuation token
const SKIP_TOKEN_MARKER: &str = "skiptoken=";

// ============================================================================
// Graph response types
// ============================================================================

/// Children collection with optional continuation link
#[derive(Debug, Deserialize)]
struct ChildrenResponse {
    #[serde(default)]
    value: Vec<DriveChild>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// A drive item as returned by a children listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveChild {
    id: String,
    name: String,
    web_url: Option<String>,
    size: Option<u64>,
    created_date_time: Option<DateTime<Utc>>,
    last_modified_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: Vec<ThumbnailSet>,
}

/// One set of thumbnails for an item
#[derive(Debug, Deserialize)]
struct ThumbnailSet {
    large: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    small: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl DriveChild {
    fn into_record(self, share_url: String) -> FileRecord {
        let thumbnail_url = pick_thumbnail(&self.thumbnails);
        FileRecord {
            id: self.id,
            name: self.name,
            web_url: self.web_url.unwrap_or_default(),
            share_url,
            size: self.size.unwrap_or(0),
            created_at: self.created_date_time,
            modified_at: self.last_modified_date_time,
            thumbnail_url,
        }
    }
}

// ============================================================================
// ListingWorkflow
// ============================================================================

/// Lists drive folders with share links and thumbnails
pub struct ListingWorkflow {
    client: Arc<GraphClient>,
    folders: Arc<FolderResolver>,
}

impl ListingWorkflow {
    pub fn new(client: Arc<GraphClient>, folders: Arc<FolderResolver>) -> Self {
        Self { client, folders }
    }

    /// Lists every child of a folder, in provider order
    pub async fn list_files(
        &self,
        drive_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FileRecord>, DriveError> {
        let path = format!("/drives/{drive_id}/items/{folder_id}/children?$expand=thumbnails");
        let value = self.client.get_json(&path).await?;
        let response: ChildrenResponse = decode(value, "children listing")?;

        debug!(folder_id, count = response.value.len(), "Listed folder");
        self.records_with_links(drive_id, response.value).await
    }

    /// Lists one page of a folder.
    ///
    /// # Arguments
    /// * `page_size` - Maximum number of items in the page
    /// * `page_token` - Continuation token from the previous page's
    ///   `next_page_token`, passed through verbatim
    pub async fn list_files_paged(
        &self,
        drive_id: &str,
        folder_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FilePage, DriveError> {
        let mut path = format!(
            "/drives/{drive_id}/items/{folder_id}/children?$expand=thumbnails&$top={page_size}"
        );
        if let Some(token) = page_token {
            path.push_str("&$skiptoken=");
            path.push_str(token);
        }

        let value = self.client.get_json(&path).await?;
        let response: ChildrenResponse = decode(value, "paged children listing")?;

        let next_page_token = response
            .next_link
            .as_deref()
            .and_then(extract_skip_token)
            .map(str::to_string);

        debug!(
            folder_id,
            count = response.value.len(),
            has_more = next_page_token.is_some(),
            "Listed folder page"
        );

        let files = self.records_with_links(drive_id, response.value).await?;
        Ok(FilePage {
            files,
            next_page_token,
        })
    }

    /// Resolves the named upload folder and lists it
    pub async fn list_folder(
        &self,
        drive_id: &str,
        folder_name: Option<&str>,
    ) -> Result<Vec<FileRecord>, DriveError> {
        let folder_id = self
            .folders
            .ensure_upload_folder(drive_id, folder_name)
            .await?;
        self.list_files(drive_id, &folder_id).await
    }

    /// Resolves the named upload folder and lists one page of it
    pub async fn list_folder_paged(
        &self,
        drive_id: &str,
        folder_name: Option<&str>,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<FilePage, DriveError> {
        let folder_id = self
            .folders
            .ensure_upload_folder(drive_id, folder_name)
            .await?;
        self.list_files_paged(drive_id, &folder_id, page_size, page_token)
            .await
    }

    /// Creates share links for all children concurrently; one failed link
    /// fails the whole listing
    async fn records_with_links(
        &self,
        drive_id: &str,
        children: Vec<DriveChild>,
    ) -> Result<Vec<FileRecord>, DriveError> {
        let records = children.into_iter().map(|child| async move {
            let share_url = share::create_view_link(&self.client, drive_id, &child.id).await?;
            Ok::<_, DriveError>(child.into_record(share_url))
        });
        try_join_all(records).await
    }
}

/// Picks the best thumbnail from the first set: large, then medium, then
/// small
fn pick_thumbnail(sets: &[ThumbnailSet]) -> Option<String> {
    let set = sets.first()?;
    [&set.large, &set.medium, &set.small]
        .into_iter()
        .find_map(|thumbnail| thumbnail.as_ref().map(|t| t.url.clone()))
}

/// Extracts the continuation token from a `@odata.nextLink` URL:
/// everything after the first `skiptoken=` marker. Links without a
/// marker (or with an empty one) carry no token.
fn extract_skip_token(next_link: &str) -> Option<&str> {
    let start = next_link.find(SKIP_TOKEN_MARKER)? + SKIP_TOKEN_MARKER.len();
    let token = &next_link[start..];
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

// ============================================================================
// Tests
// ============================================================================
