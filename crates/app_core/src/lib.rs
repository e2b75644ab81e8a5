//! ImageSpectator Core Domain Logic
//!
//! This crate contains:
//! - The lazily loaded directory tree and image entries
//! - Sort and filter helpers for the sidebar
//! - The gallery session (selection state machine, paging, autoplay)
//! - Configuration
//! - Error types
//! - Image decoding

pub mod autoplay;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod session;
pub mod sort;
pub mod tree;

pub use autoplay::{Autoplay, AutoplayConfig, AutoplayState};
pub use config::{AppConfig, PageDirection, SessionConfig, ViewMode, ViewSettings};
pub use error::AppError;
pub use image_loader::{
    get_image_dimensions, preview, DecodedImage, ImageCrateDecoder, ImageDecoder, Preview,
    ThumbnailGenerator,
};
pub use session::{GallerySession, PageSide, SelectionState};
pub use sort::DirectorySort;
pub use tree::{DirectoryNode, DirectoryTree, FileEntry, NodeId};

/// Everything the UI needs after start-up
pub struct Spectator {
    pub config: AppConfig,
    pub session: GallerySession,
    /// Flushes the log file when dropped
    _log_guard: app_log::WorkerGuard,
}

impl Spectator {
    /// Persist view settings and the current selection
    pub fn save(&mut self) -> Result<(), AppError> {
        self.session.remember(&mut self.config);
        self.config.save()
    }
}

/// Initialize logging, load the configuration and restore the last session
pub fn bootstrap() -> anyhow::Result<Spectator> {
    let log_guard = app_log::init("info")?;

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default configuration: {}", e);
        AppConfig::default()
    });

    let session = GallerySession::restore(&config);
    tracing::info!("Session restored in state {:?}", session.state());

    Ok(Spectator {
        config,
        session,
        _log_guard: log_guard,
    })
}
