//! UniversalPath - path identity for directory and file entries

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// A path wrapper used as the identity of browsed entries
///
/// Features:
/// - Equality, ordering and hashing by the raw path, never by object identity
/// - Lossy UTF-8 display string for UI
/// - Hash-based ID for fast lookups
/// - Cached base name used by sorting and filtering
#[derive(Debug, Clone)]
pub struct UniversalPath {
    /// Raw path for file system operations
    raw: PathBuf,

    /// UTF-8 display string (lossy conversion for UI)
    display: String,

    /// Lossy UTF-8 base name (empty for `/`)
    name: String,

    /// Hash-based ID for fast lookups
    id: u64,
}

impl UniversalPath {
    /// Create a new UniversalPath from any path-like type.
    ///
    /// The path is taken as is. Use [`UniversalPath::resolve`] for user input.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let raw = path.as_ref().to_path_buf();
        let display = raw.to_string_lossy().to_string();
        let name = raw
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let id = xxh3_64(display.as_bytes());

        Self {
            raw,
            display,
            name,
            id,
        }
    }

    /// Create an absolute, normalized path from user input (folder picker,
    /// restored settings). Falls back to the given path when it cannot be
    /// canonicalized, e.g. because it no longer exists.
    pub fn resolve<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let absolute = path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir().unwrap_or_default().join(path)
            }
        });
        Self::new(absolute)
    }

    /// Get the raw path for file system operations
    pub fn as_path(&self) -> &Path {
        &self.raw
    }

    /// Get the raw PathBuf (owned)
    pub fn to_path_buf(&self) -> PathBuf {
        self.raw.clone()
    }

    /// Get the display string for UI
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Get the hash ID for lookups
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Base name of the entry
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base name as the raw bytes the OS reported, for ordering
    pub fn name_bytes(&self) -> &[u8] {
        self.raw
            .file_name()
            .map(|n| n.as_encoded_bytes())
            .unwrap_or_default()
    }

    /// Get parent directory
    pub fn parent(&self) -> Option<Self> {
        self.raw.parent().map(Self::new)
    }

    /// Join with another path component
    pub fn join<P: AsRef<Path>>(&self, path: P) -> Self {
        Self::new(self.raw.join(path))
    }

    /// Is `self` equal to or below `ancestor`?
    pub fn starts_with(&self, ancestor: &UniversalPath) -> bool {
        self.raw.starts_with(&ancestor.raw)
    }
}

impl PartialEq for UniversalPath {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.raw == other.raw
    }
}

impl Eq for UniversalPath {}

impl Hash for UniversalPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for UniversalPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UniversalPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl AsRef<Path> for UniversalPath {
    fn as_ref(&self) -> &Path {
        &self.raw
    }
}

impl From<PathBuf> for UniversalPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for UniversalPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl std::fmt::Display for UniversalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_path() {
        let path1 = UniversalPath::new("/Users/test/tmp/image.jpg");
        let path2 = UniversalPath::new("/Users/test/tmp/image.jpg");
        assert_eq!(path1, path2);
        assert_eq!(path1.id(), path2.id());
        assert_ne!(path1, UniversalPath::new("/Users/test/tmp/image2.jpg"));
    }

    #[test]
    fn test_name() {
        let path = UniversalPath::new("/Users/test/tmp/Photo.JPG");
        assert_eq!(path.name(), "Photo.JPG");
        assert_eq!(path.name_bytes(), b"Photo.JPG");
        assert_eq!(UniversalPath::new("/").name(), "");
        assert!(UniversalPath::new("/").name_bytes().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_name_bytes_keep_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let a = UniversalPath::new(Path::new("/tmp").join(OsStr::from_bytes(b"\xffa.jpg")));
        let b = UniversalPath::new(Path::new("/tmp").join(OsStr::from_bytes(b"\xfea.jpg")));
        // Same lossy name, different raw names
        assert_eq!(a.name(), b.name());
        assert_ne!(a.name_bytes(), b.name_bytes());
        assert_eq!(a.name_bytes(), b"\xffa.jpg");
    }

    #[test]
    fn test_resolve_makes_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolved = UniversalPath::resolve(dir.path());
        assert!(resolved.as_path().is_absolute());
        assert!(resolved.join("a").starts_with(&resolved));
    }
}
