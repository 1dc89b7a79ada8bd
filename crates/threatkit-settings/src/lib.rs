//! ThreatKit Settings Crate
//!
//! Handles the editor configuration file: interaction timings, default
//! geometry, session defaults, and the document store location.

pub mod config;
pub mod error;

pub use config::{
    Config, GeometrySettings, InteractionSettings, SessionSettings, SizeSettings, StoreSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
