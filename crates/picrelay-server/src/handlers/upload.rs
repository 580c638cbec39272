//! Image upload handler

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, info};

use picrelay_graph::folder::DEFAULT_UPLOAD_FOLDER;

use crate::dto::{ApiSuccess, UploadData};
use crate::error::ApiFailure;
use crate::spool;
use crate::AppState;

/// Hard cap on accepted image size
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// `POST /api/upload/image`
///
/// Accepts a multipart form with an `image` file field and an optional
/// `folderName` text field. Non-image content types and files over
/// [`MAX_UPLOAD_BYTES`] are rejected before anything reaches the drive.
/// Unknown fields are ignored.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiSuccess<UploadData>>, ApiFailure> {
    let mut original_name: Option<String> = None;
    let mut content: Option<Bytes> = None;
    let mut folder_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!(error = %e, "Unreadable multipart field");
        ApiFailure::bad_request("Invalid multipart data")
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                if !content_type.starts_with("image/") {
                    return Err(ApiFailure::bad_request("Only image files are allowed"));
                }

                original_name = field.file_name().map(str::to_string);

                let bytes = field.bytes().await.map_err(|e| {
                    debug!(error = %e, "Failed to read image field");
                    ApiFailure::bad_request("Failed to read uploaded file")
                })?;

                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiFailure::bad_request("File too large (max 5MB)"));
                }

                content = Some(bytes);
            }
            "folderName" => {
                folder_name = Some(field.text().await.map_err(|e| {
                    debug!(error = %e, "Failed to read folderName field");
                    ApiFailure::bad_request("Invalid folderName field")
                })?);
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ApiFailure::bad_request("No file uploaded"))?;
    let original_name = original_name.unwrap_or_else(|| "upload".to_string());

    let spool_path = spool::stage(&state.upload_tmp_dir, &content)
        .await
        .map_err(|e| ApiFailure::internal(format!("Failed to stage upload: {e}")))?;

    let result = state
        .uploads
        .upload_image(
            &state.drive_id,
            folder_name.as_deref(),
            &original_name,
            &spool_path,
        )
        .await;

    // Spool files are removed whether the relay succeeded or not
    spool::discard(&spool_path).await;

    let outcome = result?;
    info!(file_name = %outcome.file_name, "Image uploaded");

    Ok(Json(ApiSuccess::new(UploadData {
        web_url: outcome.web_url,
        share_url: outcome.share_url,
        file_name: outcome.file_name,
        folder_name: folder_name.unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
    })))
}
