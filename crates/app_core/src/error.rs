//! Application error types

use thiserror::Error;

/// Main application error type
///
/// Every variant is local to one user action; none of them should take the
/// viewer down.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (show an empty state / placeholder) =====
    #[error("Listing failed for {path}: {reason}")]
    ListingFailed { path: String, reason: String },

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid selection: {0}")]
    InvalidTransition(String),

    // ===== Startup Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable by re-navigating or re-selecting a root?
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Init(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::ListingFailed { path, .. } => format!("Cannot open folder: {}", path),
            AppError::ImageDecode(_) => "No preview available".to_string(),
            AppError::NotFound(path) => format!("Not found: {}", path),
            _ => self.to_string(),
        }
    }
}

impl From<app_fs::FsError> for AppError {
    fn from(e: app_fs::FsError) -> Self {
        match e {
            app_fs::FsError::NotFound(p) => AppError::NotFound(p),
            app_fs::FsError::Io(io) => AppError::Io(io),
            other => AppError::Io(std::io::Error::other(other.to_string())),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::ImageDecode(e.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(e: toml::ser::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
