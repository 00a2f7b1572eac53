//! Filesystem runtime abstraction for the extractor.
//!
//! The traversal engine, the import resolver and the route-constant scanner
//! never touch `std::fs` directly. They go through the `Runtime` trait so the
//! whole pipeline can be driven against a scratch directory in tests, or
//! against a different storage backend by an embedding application.

pub mod native;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error on '{path}': {message}")]
    Io { path: PathBuf, message: String },

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

impl RuntimeError {
    /// Build an error from an `std::io::Error`, keeping `NotFound` distinguishable.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            RuntimeError::FileNotFound(path.to_path_buf())
        } else {
            RuntimeError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }
}

/// File metadata
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Whether this is a file
    pub is_file: bool,
}

/// Platform runtime trait
///
/// Abstracts the filesystem operations the extractor needs: reading sources,
/// probing candidate module paths, enumerating a source tree and persisting
/// the resulting graph.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Write a file to the filesystem
    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()>;

    /// Get file metadata
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory
    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()>;

    /// Resolve symlinks and relative components into an absolute path
    fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf>;

    /// List every regular file below `root`, recursively
    ///
    /// Order is the enumeration order of the backend. The native runtime sorts
    /// entries by file name within each directory.
    fn list_files(&self, root: &Path) -> RuntimeResult<Vec<PathBuf>>;
}

/// Read a file as text, dropping bytes that are not valid UTF-8.
pub async fn read_text(runtime: &dyn Runtime, path: &Path) -> RuntimeResult<String> {
    let bytes = runtime.read_file(path).await?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).replace('\u{FFFD}', ""),
    })
}

/// Read at most `limit` characters of a file; unreadable files yield an empty string.
pub async fn read_text_limit(runtime: &dyn Runtime, path: &Path, limit: usize) -> String {
    match read_text(runtime, path).await {
        Ok(text) => truncate_chars(&text, limit).to_string(),
        Err(_) => String::new(),
    }
}

/// Truncate a string to its first `limit` characters.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
