//! Build configuration and the two-tier filesystem layout.
//!
//! One [`BuildConfig`] is constructed at run start and threaded through the
//! resolver, pipeline, and orchestrator; nothing reads the environment after
//! construction.

use std::path::{Path, PathBuf};

use crate::types::IconColor;

/// Rasterizer resolution handed to `dvipng -D`.
pub const DEFAULT_DPI: u32 = 600;
/// Gamma correction handed to `dvipng --gamma`.
pub const DEFAULT_GAMMA: f64 = 1.0;
/// Square icon canvas edge, in pixels.
pub const ICON_SIZE: u32 = 64;

pub const CATALOG_FILENAME: &str = "symbols.json";
pub const METADATA_FILENAME: &str = "symbols_data.json";
pub const ICONS_DIRNAME: &str = "icons";

/// Directory roots and render tuning for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Read-only tier shipped with the catalog install. Never written.
    pub base_dir: PathBuf,
    /// Writable tier owned by the end user; all new output lands here.
    pub user_dir: PathBuf,
    /// Passed through to the rasterizer. Not part of cache keys.
    pub dpi: u32,
    /// Passed through to the rasterizer. Not part of cache keys.
    pub gamma: f64,
}

impl BuildConfig {
    pub fn new(base_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            user_dir: user_dir.into(),
            dpi: DEFAULT_DPI,
            gamma: DEFAULT_GAMMA,
        }
    }

    /// Same as [`BuildConfig::new`], honoring the `DPI` and `GAMMA`
    /// environment overrides. Unparseable values are ignored with a warning.
    pub fn from_env(base_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::new(base_dir, user_dir);
        if let Ok(value) = std::env::var("DPI") {
            match value.parse() {
                Ok(dpi) => config.dpi = dpi,
                Err(_) => tracing::warn!("ignoring invalid DPI override: {value}"),
            }
        }
        if let Ok(value) = std::env::var("GAMMA") {
            match value.parse() {
                Ok(gamma) => config.gamma = gamma,
                Err(_) => tracing::warn!("ignoring invalid GAMMA override: {value}"),
            }
        }
        config
    }

    pub fn base_catalog_path(&self) -> PathBuf {
        self.base_dir.join(CATALOG_FILENAME)
    }

    pub fn user_catalog_path(&self) -> PathBuf {
        self.user_dir.join(CATALOG_FILENAME)
    }

    /// The catalog a build reads: the user override when present, the base
    /// catalog otherwise.
    pub fn catalog_path(&self) -> PathBuf {
        let user = self.user_catalog_path();
        if user.is_file() {
            user
        } else {
            self.base_catalog_path()
        }
    }

    /// Metadata index location; always rewritten into the user tier.
    pub fn metadata_path(&self) -> PathBuf {
        self.user_dir.join(METADATA_FILENAME)
    }

    /// Pre-built metadata shipped with the base tier, read when the user
    /// tier has none.
    pub fn base_metadata_path(&self) -> PathBuf {
        self.base_dir.join(METADATA_FILENAME)
    }

    /// Tier-relative icon path recorded in the metadata index. Always uses
    /// forward slashes so the index is portable between machines.
    pub fn icon_rel_path(color: IconColor, filename: &str) -> String {
        format!("{ICONS_DIRNAME}/{color}/{filename}")
    }

    pub fn base_icon_path(&self, color: IconColor, filename: &str) -> PathBuf {
        Self::icon_abs_path(&self.base_dir, color, filename)
    }

    pub fn user_icon_path(&self, color: IconColor, filename: &str) -> PathBuf {
        Self::icon_abs_path(&self.user_dir, color, filename)
    }

    pub fn user_icon_dir(&self, color: IconColor) -> PathBuf {
        self.user_dir.join(ICONS_DIRNAME).join(color.as_str())
    }

    fn icon_abs_path(root: &Path, color: IconColor, filename: &str) -> PathBuf {
        root.join(ICONS_DIRNAME).join(color.as_str()).join(filename)
    }
}
