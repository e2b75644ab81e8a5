//! Application configuration

use crate::autoplay::AutoplayConfig;
use crate::sort::DirectorySort;
use crate::AppError;
use app_fs::ScanOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub view: ViewSettings,
    pub browse: ScanOptions,
    pub autoplay: AutoplayConfig,
    pub session: SessionConfig,
}

/// How images of the selected folder are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "grid")]
    Grid,
    #[serde(rename = "vertical")]
    Vertical,
    #[serde(rename = "horizontal")]
    Horizontal,
}

/// Reading direction of the horizontal pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageDirection {
    /// Pages advance to the right (left-to-right reading)
    #[default]
    #[serde(rename = "right")]
    Right,
    /// Pages advance to the left (right-to-left reading)
    #[serde(rename = "left")]
    Left,
}

pub const GRID_COLUMNS_MIN: u8 = 4;
pub const GRID_COLUMNS_MAX: u8 = 10;
pub const PER_PAGE_MIN: u8 = 1;
pub const PER_PAGE_MAX: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub view_mode: ViewMode,
    pub grid_columns: u8,
    pub horizontal_per_page: u8,
    pub horizontal_direction: PageDirection,
    pub directory_sort: DirectorySort,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Grid,
            grid_columns: GRID_COLUMNS_MIN,
            horizontal_per_page: PER_PAGE_MIN,
            horizontal_direction: PageDirection::Right,
            directory_sort: DirectorySort::Name,
        }
    }
}

impl ViewSettings {
    pub fn set_grid_columns(&mut self, columns: u8) {
        self.grid_columns = columns.clamp(GRID_COLUMNS_MIN, GRID_COLUMNS_MAX);
    }

    pub fn set_horizontal_per_page(&mut self, per_page: u8) {
        self.horizontal_per_page = per_page.clamp(PER_PAGE_MIN, PER_PAGE_MAX);
    }

    /// Images per row (grid, vertical) or per page (horizontal)
    pub fn effective_columns(&self) -> usize {
        match self.view_mode {
            ViewMode::Grid => self.grid_columns as usize,
            ViewMode::Vertical => 1,
            ViewMode::Horizontal => self.horizontal_per_page as usize,
        }
    }

    /// Clamp values that came from a hand-edited file
    pub fn normalize(&mut self) {
        self.set_grid_columns(self.grid_columns);
        self.set_horizontal_per_page(self.horizontal_per_page);
    }
}

/// What is re-opened at the next start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub last_root: Option<PathBuf>,
    pub last_directory: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::info!("Using default configuration");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.view.normalize();
        config.autoplay.normalize();

        tracing::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "ImageSpectator", "ImageSpectator")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }
}
