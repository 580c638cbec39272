//! Picrelay Graph - Microsoft Graph API client
//!
//! Implements the OneDrive relay workflows on top of Microsoft Graph v1.0
//! with app-only (client credentials) authentication.
//!
//! ## Components
//!
//! - [`token::TokenManager`]: acquires and caches app-only access tokens
//! - [`client::GraphClient`]: authenticated JSON calls against Graph
//! - [`folder::FolderResolver`]: resolves and creates destination folders
//!   under the drive's `Pictures` root
//! - [`upload::UploadWorkflow`]: upload session + ranged transfer + share
//!   link creation
//! - [`listing::ListingWorkflow`]: folder listings with thumbnails and
//!   share links, full or paginated
//! - [`drives`]: drive discovery helpers for operators

use thiserror::Error;

pub mod client;
pub mod drives;
pub mod folder;
pub mod listing;
mod share;
pub mod token;
pub mod upload;

// ============================================================================
// Error types
// ============================================================================

/// Errors produced while talking to the identity platform or the Graph API
#[derive(Debug, Error)]
pub enum DriveError {
    /// A required Microsoft credential setting is missing or empty
    #[error("Missing required Microsoft configuration: {0}")]
    AuthConfig(String),

    /// The token endpoint rejected or never received the token request
    #[error("Token request failed: {0}")]
    AuthRequest(#[from] AuthRequestError),

    /// A Graph API call answered with a non-success status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The drive has no `Pictures` root folder to place uploads under
    #[error("Pictures root folder not found in drive {drive_id}")]
    RootFolderMissing {
        /// Drive that was inspected
        drive_id: String,
    },

    /// The upload session could not be created
    #[error("Failed to create upload session: {source}")]
    SessionCreation {
        #[source]
        source: Box<DriveError>,
    },

    /// The ranged PUT against the upload session URL failed
    #[error("Upload transfer failed: {0}")]
    UploadTransfer(String),

    /// The share link for an uploaded file could not be created
    #[error("Failed to create share link: {source}")]
    ShareLink {
        #[source]
        source: Box<DriveError>,
    },

    /// Graph answered with a success status but an unusable body
    #[error("Invalid response from Graph API: {0}")]
    InvalidResponse(String),

    /// Transport-level failure while calling Graph
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Failure kinds for the OAuth2 client-credentials token request
#[derive(Debug, Error)]
pub enum AuthRequestError {
    /// The identity platform rejected the client id/secret pair
    #[error("invalid client credentials")]
    InvalidCredentials,

    /// The token request itself was malformed
    #[error("bad request: {0}")]
    MalformedRequest(String),

    /// The identity platform could not be reached
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),

    /// Any other token endpoint failure
    #[error("status {status}: {description}")]
    Other {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Error description extracted from the response body
        description: String,
    },
}

/// A non-success response from the Graph API
#[derive(Debug, Error)]
#[error("Graph API error ({status}): {message}")]
pub struct ApiError {
    /// HTTP status code Graph answered with
    pub status: u16,
    /// Status-derived classification
    pub kind: ApiErrorKind,
    /// Message extracted from the Graph error body, or the raw body
    pub message: String,
}

/// Classification of Graph API failures by HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401 - the access token was missing, expired or revoked
    Unauthorized,
    /// 403 - the application lacks the required permission
    Forbidden,
    /// 404 - the drive, folder or item does not exist
    NotFound,
    /// Any other non-success status
    Unknown,
}

impl ApiErrorKind {
    /// Maps an HTTP status code to its failure classification
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}
