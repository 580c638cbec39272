//! Temp-file spooling for incoming uploads
//!
//! Multipart uploads are written to the spool directory under a random
//! hex name with no extension; the stored name on the drive combines
//! that base with the original upload's extension. Spool files never
//! outlive the request that created them.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// Writes upload bytes to a freshly named spool file, creating the
/// directory on first use
pub async fn stage(dir: &Path, data: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(Uuid::new_v4().simple().to_string());
    tokio::fs::write(&path, data).await?;
    Ok(path)
}

/// Best-effort removal of a spool file
pub async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove spool file");
    }
}
