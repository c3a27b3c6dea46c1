//! Per-request scratch directory holding the uploaded package and its extraction.

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::multipart::Field;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use crate::error::ApiError;

const FALLBACK_FILE_NAME: &str = "model.fmu";

/// A uniquely named directory inside the work directory, removed when dropped.
#[derive(Debug)]
pub struct UploadWorkspace {
    dir: TempDir,
}

impl UploadWorkspace {
    pub fn new(work_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(work_dir)
            .with_context(|| format!("Creating work directory {}", work_dir.display()))?;
        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(work_dir)
            .context("Creating upload directory")?;
        log::debug!("Created upload directory {:?}", dir.path());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where an upload named `file_name` is stored.
    pub fn package_path(&self, file_name: Option<&str>) -> PathBuf {
        self.path().join(sanitize_file_name(file_name))
    }

    /// Stream a multipart file field to disk and return its path.
    pub async fn receive(&self, mut field: Field<'_>) -> Result<PathBuf, ApiError> {
        let path = self.package_path(field.file_name());
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("Creating {}", path.display()))?;

        let mut size = 0;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len();
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Writing {}", path.display()))?;
        }
        file.flush().await.context("Flushing upload")?;

        log::info!("Received {} ({size} bytes)", path.display());
        Ok(path)
    }

    /// Remove the directory, reporting failures instead of ignoring them as `Drop` does.
    pub fn close(self) -> std::io::Result<()> {
        let path = self.path().to_owned();
        self.dir.close()?;
        log::debug!("Removed upload directory {path:?}");
        Ok(())
    }
}

/// Keep only the last path component of a client supplied file name.
fn sanitize_file_name(file_name: Option<&str>) -> &str {
    file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_FILE_NAME)
}
