//! On-disk configuration.
//!
//! A TOML file with three optional sections. Every field has a default, so an
//! empty or partial file is valid:
//!
//! ```toml
//! [toggle]
//! tool = "pnputil.exe"
//!
//! [sound]
//! enabled = true
//! lock_sound = 'C:\Windows\Media\Speech Off.wav'
//! unlock_sound = 'C:\Windows\Media\Speech On.wav'
//!
//! [log]
//! level = "info"
//! dir = 'C:\ProgramData\sagelock\logs'
//! ```
//!
//! The timing window and the key pattern are fixed and cannot be configured.

use crate::error::{Result, SageError};
use crate::toggle::DEFAULT_TOOL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toggle: ToggleConfig,
    pub sound: SoundConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Device-management utility invoked with `/enable-device` / `/disable-device`.
    pub tool: String,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    /// Played when touch input gets disabled.
    pub lock_sound: PathBuf,
    /// Played when touch input gets re-enabled.
    pub unlock_sound: PathBuf,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lock_sound: PathBuf::from(r"C:\Windows\Media\Speech Off.wav"),
            unlock_sound: PathBuf::from(r"C:\Windows\Media\Speech On.wav"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for daily-rolling log files. Console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| SageError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a file that must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SageError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// `<config_dir>/sagelock/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sagelock").join("config.toml"))
    }

    /// Load `explicit` if given, else the default path if it exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
