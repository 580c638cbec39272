//! Picrelay Server - HTTP surface for the OneDrive image relay
//!
//! Exposes the upload and listing workflows as a small JSON API:
//!
//! - `POST /api/upload/image`: multipart image upload into the drive
//! - `GET /api/files`: full listing of an upload folder
//! - `GET /api/files/paginated`: paged listing with continuation tokens
//! - `GET /health`: liveness probe
//!
//! The server holds no state of its own beyond the spool directory;
//! everything else lives in OneDrive.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod spool;

use std::path::PathBuf;
use std::sync::Arc;

use picrelay_core::config::Config;
use picrelay_graph::client::GraphClient;
use picrelay_graph::folder::FolderResolver;
use picrelay_graph::listing::ListingWorkflow;
use picrelay_graph::token::TokenManager;
use picrelay_graph::upload::UploadWorkflow;

/// Shared application state handed to every handler
pub struct AppState {
    /// Drive all uploads and listings target
    pub drive_id: String,
    /// Directory multipart uploads are spooled to before transfer
    pub upload_tmp_dir: PathBuf,
    /// Upload workflow over the shared Graph client
    pub uploads: UploadWorkflow,
    /// Listing workflow over the shared Graph client
    pub listings: ListingWorkflow,
}

impl AppState {
    /// Builds the full component stack from configuration
    pub fn new(config: &Config) -> Self {
        let tokens = Arc::new(TokenManager::new(config.graph.clone()));
        let client = Arc::new(GraphClient::new(tokens));
        let folders = Arc::new(FolderResolver::new(Arc::clone(&client)));

        Self {
            drive_id: config.graph.drive_id.clone(),
            upload_tmp_dir: config.server.upload_tmp_dir.clone(),
            uploads: UploadWorkflow::new(Arc::clone(&client), Arc::clone(&folders)),
            listings: ListingWorkflow::new(client, folders),
        }
    }
}
