//! File system browser - single directory scan with image filtering

use crate::{FsError, Result, UniversalPath};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Extensions recognized as images (compared lowercased)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Check if a path has an allowed image extension (case-insensitive)
pub fn is_allowed_image<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

/// Options for scanning a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Include entries whose name starts with a dot
    pub show_hidden: bool,
    /// Resolve symbolic links; when false they are skipped
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            follow_symlinks: true,
        }
    }
}

/// One entry kept by [`scan_directory`]
#[derive(Debug, Clone)]
pub struct ScannedEntry {
    pub path: UniversalPath,
    /// Creation time; `None` when the platform or file system cannot report it
    pub created: Option<SystemTime>,
}

/// Result of scanning one directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    /// Sub-directories in discovery order
    pub directories: Vec<ScannedEntry>,
    /// Allowed images sorted by name (byte order)
    pub images: Vec<ScannedEntry>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.images.is_empty()
    }
}

/// Scan the immediate children of `path`.
///
/// Sub-directories are kept in the order the OS reports them. Regular files
/// are kept only with an allowed image extension, sorted by name.
/// Entries that cannot be inspected (dangling links, races with deletion)
/// are skipped.
pub fn scan_directory<P: AsRef<Path>>(path: P, options: &ScanOptions) -> Result<DirectoryListing> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
    if !metadata.is_dir() {
        return Err(FsError::NotADirectory(path.display().to_string()));
    }

    let mut listing = DirectoryListing::default();

    for entry in fs::read_dir(path).map_err(|e| FsError::from_io(path, e))? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };

        let entry_path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if !options.show_hidden && is_hidden_file(&entry_path, &name) {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", entry_path.display(), e);
                continue;
            }
        };

        let metadata = if file_type.is_symlink() {
            if !options.follow_symlinks {
                continue;
            }
            // Follows the link; dangling links fail here
            match fs::metadata(&entry_path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping dangling link {}: {}", entry_path.display(), e);
                    continue;
                }
            }
        } else {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", entry_path.display(), e);
                    continue;
                }
            }
        };

        if metadata.is_dir() {
            listing.directories.push(ScannedEntry {
                path: UniversalPath::new(&entry_path),
                created: metadata.created().ok(),
            });
        } else if metadata.is_file() && is_allowed_image(&entry_path) {
            listing.images.push(ScannedEntry {
                path: UniversalPath::new(&entry_path),
                created: metadata.created().ok(),
            });
        }
    }

    listing
        .images
        .sort_by(|a, b| compare_names(a.path.name_bytes(), b.path.name_bytes()));

    Ok(listing)
}

/// Creation time of a path, following links
pub fn created_time<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.created()).ok()
}

/// Plain lexical comparison of raw entry names (byte order, no locale)
pub fn compare_names(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Check if a file is hidden
#[cfg(windows)]
fn is_hidden_file(path: &Path, name: &str) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    name.starts_with('.')
        || fs::symlink_metadata(path)
            .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
            .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden_file(_path: &Path, name: &str) -> bool {
    name.starts_with('.')
}
