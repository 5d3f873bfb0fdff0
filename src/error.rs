//! Crate error type.
//!
//! Most of these never escape the component that produced them: enumeration and
//! toggle failures are logged and skipped at the boundary (see
//! [`DeviceRegistry`](crate::registry::DeviceRegistry) and
//! [`LockController`](crate::controller::LockController)). Only startup errors
//! (configuration, message window setup) reach `main`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SageError {
    /// The HID enumeration mechanism itself is unavailable.
    #[error("HID enumeration unavailable: {0}")]
    Enumeration(String),

    /// A HID interface could not be opened for a capability query.
    #[error("failed to open HID interface {path} (os error {code})")]
    DeviceOpen { path: String, code: u32 },

    /// Preparsed data or top-level caps could not be read.
    #[error("failed to read HID caps for {path}: {reason}")]
    Caps { path: String, reason: String },

    /// The stable device instance id could not be derived.
    #[error("cannot resolve device id from {0}")]
    DeviceId(String),

    /// The device-management utility could not be started.
    #[error("failed to run {tool}: {source}")]
    ToggleSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The device-management utility ran but reported failure.
    #[error("{tool} exited with {code:?} for device {device_id}")]
    ToggleExit {
        tool: String,
        device_id: String,
        code: Option<i32>,
    },

    #[error("config file {path} could not be read: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is invalid: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A Win32 call needed by the event loop or startup failed.
    #[error("{call} failed (os error {code})")]
    Platform { call: &'static str, code: u32 },

    /// Another instance already holds the single-instance lock.
    #[error("another instance is already running")]
    AlreadyRunning,

    #[error("logger: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, SageError>;
