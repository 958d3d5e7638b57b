//! Scratch-directory initialisation.
//!
//! The OCR fallback needs a place for its transient artifacts. The
//! directory is created once, explicitly, before serving begins — the CLI
//! does it at startup and tests in their setup — rather than as an ambient
//! side effect of the first request. Creation is idempotent: a
//! pre-existing directory is fine.
//!
//! Beyond this one `create_dir_all`, the directory is treated as a
//! write-only, request-partitioned namespace: the pipeline only ever
//! creates uniquely named files in it and deletes them before returning,
//! so no cross-request synchronisation is needed.

use std::path::Path;

use tracing::debug;

use crate::error::ExtractError;

/// Create the scratch directory if it does not already exist.
pub async fn init(dir: &Path) -> Result<(), ExtractError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        ExtractError::Internal(format!(
            "failed to create scratch directory '{}': {e}",
            dir.display()
        ))
    })?;
    debug!("scratch directory ready: {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_directory() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("nested/scratch");
        init(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("scratch");
        init(&dir).await.unwrap();
        init(&dir).await.unwrap();
        assert!(dir.is_dir());
    }
}
