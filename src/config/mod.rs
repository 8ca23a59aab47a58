//! Configuration file support for draftboard.
//!
//! Settings are loaded from `~/.config/draftboard/config.toml` and cover
//! drawing defaults, history depth, the board background, and session
//! persistence. If no config file exists, sensible defaults are used
//! automatically.

use crate::draw::{Color, color};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in
/// the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_line_width = 5.0
/// default_color = "#000000"
///
/// [history]
/// max_depth = 20
///
/// [board]
/// background = "#ffffff"
///
/// [session]
/// compress = "auto"
/// backup_retention = 1
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Drawing tool defaults (size channel, color)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Undo/redo depth
    #[serde(default)]
    pub history: HistoryConfig,

    /// Board appearance
    #[serde(default)]
    pub board: BoardConfig,

    /// Session persistence settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Drawing tool defaults.
#[derive(Debug, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Initial value of the shared size channel.
    #[serde(default = "default_line_width")]
    pub default_line_width: f64,

    /// Initial stroke color as a hex string.
    #[serde(default = "default_color")]
    pub default_color: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_line_width: default_line_width(),
            default_color: default_color(),
        }
    }
}

impl DrawingConfig {
    /// Parses the configured color, falling back to black on bad input.
    pub fn color(&self) -> Color {
        Color::from_hex(&self.default_color).unwrap_or_else(|| {
            warn!(
                "invalid drawing.default_color {:?}, falling back to black",
                self.default_color
            );
            color::BLACK
        })
    }
}

/// Undo/redo configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Bound on the undo stack; the oldest entry is evicted beyond this.
    #[serde(default = "default_history_depth")]
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: default_history_depth(),
        }
    }
}

/// Board appearance settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Background color behind the persistent layer, as a hex string.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
        }
    }
}

impl BoardConfig {
    /// Parses the configured background, falling back to white on bad input.
    pub fn background_color(&self) -> Color {
        Color::from_hex(&self.background).unwrap_or_else(|| {
            warn!(
                "invalid board.background {:?}, falling back to white",
                self.background
            );
            color::WHITE
        })
    }
}

/// Where session files are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStorageMode {
    /// Platform data directory (`~/.local/share/draftboard`)
    Auto,
    /// Next to the config file
    Config,
    /// An explicit `custom_directory`
    Custom,
}

/// Gzip preference for session files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionCompression {
    Auto,
    On,
    Off,
}

/// Session persistence settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_mode")]
    pub storage: SessionStorageMode,

    /// Required when `storage = "custom"`.
    #[serde(default)]
    pub custom_directory: Option<String>,

    #[serde(default = "default_compression")]
    pub compress: SessionCompression,

    /// Auto-compression kicks in above this payload size.
    #[serde(default = "default_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Refuse to save or load session files larger than this.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Number of rotated backups to keep (0 disables backups).
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: default_storage_mode(),
            custom_directory: None,
            compress: default_compression(),
            auto_compress_threshold_kb: default_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
            backup_retention: default_backup_retention(),
        }
    }
}

fn default_line_width() -> f64 {
    5.0
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_history_depth() -> usize {
    20
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_storage_mode() -> SessionStorageMode {
    SessionStorageMode::Auto
}

fn default_compression() -> SessionCompression {
    SessionCompression::Auto
}

fn default_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_backup_retention() -> usize {
    1
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning
    /// is logged, so a hand-edited config file can never take the core into
    /// undefined territory.
    pub fn validate(&mut self) {
        if !(0.5..=100.0).contains(&self.drawing.default_line_width) {
            warn!(
                "drawing.default_line_width {} out of range, clamping",
                self.drawing.default_line_width
            );
            self.drawing.default_line_width = self.drawing.default_line_width.clamp(0.5, 100.0);
        }
        if self.history.max_depth == 0 || self.history.max_depth > 200 {
            warn!(
                "history.max_depth {} out of range, clamping",
                self.history.max_depth
            );
            self.history.max_depth = self.history.max_depth.clamp(1, 200);
        }
        if self.session.max_file_size_mb == 0 {
            warn!("session.max_file_size_mb must be at least 1, clamping");
            self.session.max_file_size_mb = 1;
        }
    }

    /// Returns the configuration directory (`~/.config/draftboard`).
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("draftboard"))
    }

    /// Loads the configuration from disk, or defaults when absent.
    pub fn load() -> Result<Self> {
        let Some(dir) = Self::config_dir() else {
            debug!("no config directory available, using defaults");
            return Ok(Self::default());
        };
        let path = dir.join("config.toml");
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate();
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.drawing.default_line_width, 5.0);
        assert_eq!(config.history.max_depth, 20);
        assert_eq!(config.drawing.color(), color::BLACK);
        assert_eq!(config.board.background_color(), color::WHITE);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        let mut config = Config::default();
        config.drawing.default_line_width = 5000.0;
        config.history.max_depth = 0;
        config.session.max_file_size_mb = 0;
        config.validate();
        assert_eq!(config.drawing.default_line_width, 100.0);
        assert_eq!(config.history.max_depth, 1);
        assert_eq!(config.session.max_file_size_mb, 1);
    }

    #[test]
    fn partial_toml_uses_section_defaults() {
        let config: Config = toml::from_str(
            r##"
            [drawing]
            default_color = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(config.drawing.default_line_width, 5.0);
        assert_eq!(config.drawing.color(), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(config.session.backup_retention, 1);
        assert_eq!(config.session.compress, SessionCompression::Auto);
    }

    #[test]
    fn invalid_color_falls_back() {
        let drawing = DrawingConfig {
            default_line_width: 5.0,
            default_color: "not-a-color".into(),
        };
        assert_eq!(drawing.color(), color::BLACK);
    }
}
