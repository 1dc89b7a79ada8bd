//! Settings errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to locate, read, parse or write the configuration file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("no configuration directory on this platform")]
    NoConfigDirectory,

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot encode config as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// A configuration that parsed but cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.toml` and `.json` files are understood.
    #[error("unsupported config extension '{0}'")]
    UnsupportedFormat(String),

    #[error("{key} out of range: {value}")]
    OutOfRange { key: String, value: String },

    #[error("{0} must not be empty")]
    Empty(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
