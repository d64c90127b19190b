//! Loading the APK to publish.

use crate::error::{PublishError, Result};
use bytes::Bytes;
use std::path::Path;

/// Content type the Play API expects for APK uploads
pub const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";

/// Read the artifact fully into memory.
///
/// Empty files are rejected here rather than by the service.
pub async fn read_artifact(path: &Path) -> Result<Bytes> {
    let data = tokio::fs::read(path).await.map_err(|e| PublishError::Artifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if data.is_empty() {
        return Err(PublishError::Artifact {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }

    log::debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(Bytes::from(data))
}
