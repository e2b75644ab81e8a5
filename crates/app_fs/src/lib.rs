//! ImageSpectator File System Layer
//!
//! Provides the read-only file system access the gallery needs:
//! - UniversalPath: path identity for directories and images
//! - Directory scanning with allowed-extension filtering

mod universal_path;
mod browser;

pub use universal_path::UniversalPath;
pub use browser::{
    compare_names, created_time, is_allowed_image, scan_directory, DirectoryListing, ScanOptions,
    ScannedEntry, IMAGE_EXTENSIONS,
};

use std::path::Path;
use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),
}

impl FsError {
    /// Attach the failing path to common I/O error kinds
    pub fn from_io(path: &Path, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => {
                FsError::AccessDenied(path.display().to_string())
            }
            _ => FsError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
