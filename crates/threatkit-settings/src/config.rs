//! Configuration and settings management for ThreatKit
//!
//! The configuration file is organized into sections:
//! - Interaction (hit-test tolerance, edit coalescing, toast spacing)
//! - Geometry (default and minimum node sizes, random placement extent)
//! - Session (defaults for new documents, owner id)
//! - Store (where the file-backed document store lives)
//!
//! Every field has a default, so partial files are accepted.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use threatkit_core::constants;
use threatkit_core::ModelKind;

/// Pointer and timing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Distance (canvas units) within which a click hits an edge
    pub edge_hit_tolerance: f64,
    /// Delay before a non-name property edit is committed
    pub property_debounce_ms: u64,
    /// Minimum spacing between load confirmations
    pub confirmation_interval_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            edge_hit_tolerance: constants::EDGE_HIT_TOLERANCE,
            property_debounce_ms: constants::PROPERTY_DEBOUNCE_MS,
            confirmation_interval_ms: constants::CONFIRMATION_INTERVAL_MS,
        }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeSettings {
    pub width: f64,
    pub height: f64,
}

impl SizeSettings {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<(f64, f64)> for SizeSettings {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

/// Default node geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Side of the square in which nodes without a position are placed
    pub placement_extent: f64,
    pub regular_default: SizeSettings,
    pub regular_min: SizeSettings,
    pub container_default: SizeSettings,
    pub container_min: SizeSettings,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            placement_extent: constants::PLACEMENT_EXTENT,
            regular_default: constants::REGULAR_DEFAULT_SIZE.into(),
            regular_min: constants::REGULAR_MIN_SIZE.into(),
            container_default: constants::CONTAINER_DEFAULT_SIZE.into(),
            container_min: constants::CONTAINER_MIN_SIZE.into(),
        }
    }
}

/// Defaults for new sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub default_name: String,
    pub default_kind: ModelKind,
    /// Owner id passed to the document store
    pub owner_id: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_name: constants::DEFAULT_DOCUMENT_NAME.to_string(),
            default_kind: ModelKind::Infrastructure,
            owner_id: "local".to_string(),
        }
    }
}

/// File-backed document store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub directory: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            directory: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("threatkit")
                .join("documents"),
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interaction: InteractionSettings,
    pub geometry: GeometrySettings,
    pub session: SessionSettings,
    pub store: StoreSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/threatkit/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("threatkit").join("config.toml"))
            .ok_or(SettingsError::NoConfigDirectory)
    }

    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML, chosen by extension)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let interaction = &self.interaction;
        if !(interaction.edge_hit_tolerance.is_finite() && interaction.edge_hit_tolerance > 0.0) {
            return Err(out_of_range(
                "interaction.edge_hit_tolerance",
                interaction.edge_hit_tolerance,
            ));
        }

        let (min_ms, max_ms) = constants::PROPERTY_DEBOUNCE_RANGE_MS;
        if !(min_ms..=max_ms).contains(&interaction.property_debounce_ms) {
            return Err(out_of_range(
                "interaction.property_debounce_ms",
                interaction.property_debounce_ms,
            ));
        }

        let geometry = &self.geometry;
        for (key, size) in [
            ("geometry.regular_default", geometry.regular_default),
            ("geometry.regular_min", geometry.regular_min),
            ("geometry.container_default", geometry.container_default),
            ("geometry.container_min", geometry.container_min),
        ] {
            if !size.is_positive() {
                return Err(out_of_range(key, format!("{}x{}", size.width, size.height)));
            }
        }

        if geometry.regular_default.width < geometry.regular_min.width
            || geometry.regular_default.height < geometry.regular_min.height
        {
            return Err(out_of_range(
                "geometry.regular_default",
                "smaller than geometry.regular_min",
            ));
        }

        if geometry.container_default.width < geometry.container_min.width
            || geometry.container_default.height < geometry.container_min.height
        {
            return Err(out_of_range(
                "geometry.container_default",
                "smaller than geometry.container_min",
            ));
        }

        if !(geometry.placement_extent.is_finite() && geometry.placement_extent >= 0.0) {
            return Err(out_of_range(
                "geometry.placement_extent",
                geometry.placement_extent,
            ));
        }

        if self.session.default_name.trim().is_empty() {
            return Err(ConfigError::Empty("session.default_name".to_string()));
        }

        if self.session.owner_id.trim().is_empty() {
            return Err(ConfigError::Empty("session.owner_id".to_string()));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
