//! Native runtime backed by `tokio::fs` and `walkdir`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Runtime that talks to the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| RuntimeError::from_io(path, e))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| RuntimeError::from_io(path, e))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| RuntimeError::from_io(path, e))?;
        Ok(FileMetadata {
            size: meta.len(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let result = if recursive {
            tokio::fs::create_dir_all(path).await
        } else {
            tokio::fs::create_dir(path).await
        };
        result.map_err(|e| RuntimeError::from_io(path, e))
    }

    fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf> {
        path.canonicalize()
            .map_err(|e| RuntimeError::from_io(path, e))
    }

    fn list_files(&self, root: &Path) -> RuntimeResult<Vec<PathBuf>> {
        if !root.exists() {
            return Err(RuntimeError::FileNotFound(root.to_path_buf()));
        }

        let files = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();

        Ok(files)
    }
}
