//! Trust checks for staged uploads.

use std::path::{Path, PathBuf};

use tokio::fs as async_fs;
use uuid::Uuid;

use crate::error::{DepotError, Result};

pub trait UploadOrigin: Send + Sync {
    /// Whether `path` was produced by the upload intake.
    fn is_uploaded_file(&self, path: &Path) -> bool;
}

/// Accepts every descriptor; the caller vouches for the temp path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyOrigin;

impl UploadOrigin for AnyOrigin {
    fn is_uploaded_file(&self, _path: &Path) -> bool {
        true
    }
}

/// Directory the HTTP intake writes raw upload bytes into. Only regular
/// files that resolve to a location inside it are trusted.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn initialize(&self) -> Result<()> {
        async_fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DepotError::io("create", &self.dir, e))
    }

    /// Writes `data` to a fresh, uniquely named file in the staging area.
    pub async fn stage(&self, data: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(format!("upload-{}", Uuid::new_v4()));
        async_fs::write(&path, data)
            .await
            .map_err(|e| DepotError::io("stage", &path, e))?;
        Ok(path)
    }

    pub async fn discard(&self, path: &Path) {
        if let Err(e) = async_fs::remove_file(path).await {
            tracing::warn!("Failed to remove staged upload {}: {}", path.display(), e);
        }
    }
}

impl UploadOrigin for StagingArea {
    fn is_uploaded_file(&self, path: &Path) -> bool {
        let (Ok(dir), Ok(file)) = (self.dir.canonicalize(), path.canonicalize()) else {
            return false;
        };
        file.is_file() && file.starts_with(dir)
    }
}
