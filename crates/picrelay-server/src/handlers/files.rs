//! Folder listing handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use tracing::debug;

use picrelay_core::model::FilePage;
use picrelay_graph::folder::DEFAULT_UPLOAD_FOLDER;

use crate::dto::{ApiSuccess, FilesData, ListQuery, PagedQuery};
use crate::error::ApiFailure;
use crate::AppState;

/// `GET /api/files`
///
/// Lists every file in the named upload folder; defaults to the standard
/// upload folder when the query names none.
pub async fn get_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiSuccess<FilesData>>, ApiFailure> {
    let folder_name = query.folder_name.as_deref();
    debug!(
        folder = folder_name.unwrap_or(DEFAULT_UPLOAD_FOLDER),
        "Listing files"
    );

    let files = state
        .listings
        .list_folder(&state.drive_id, folder_name)
        .await?;

    Ok(Json(ApiSuccess::new(FilesData {
        files,
        folder_name: folder_name.unwrap_or(DEFAULT_UPLOAD_FOLDER).to_string(),
    })))
}

/// `GET /api/files/paginated`
///
/// Lists one page of the named upload folder. The page size defaults to
/// 10; the continuation token from a previous page comes back through
/// `pageToken`.
pub async fn get_files_paginated(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PagedQuery>,
) -> Result<Json<ApiSuccess<FilePage>>, ApiFailure> {
    debug!(
        folder = query.folder_name.as_deref().unwrap_or(DEFAULT_UPLOAD_FOLDER),
        page_size = query.page_size,
        "Listing files page"
    );

    let page = state
        .listings
        .list_folder_paged(
            &state.drive_id,
            query.folder_name.as_deref(),
            query.page_size,
            query.page_token.as_deref(),
        )
        .await?;

    Ok(Json(ApiSuccess::new(page)))
}
