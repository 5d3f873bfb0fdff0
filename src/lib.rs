//! SageLock — lock touch screens with the volume keys.
//!
//! Pressing volume up, down, up, down in quick succession disables every touch
//! digitizer attached at startup; the same sequence enables them again.
//!
//! - [`PatternDetector`] recognizes the key sequence
//! - [`DeviceRegistry`] finds the touch digitizers once
//! - [`LockController`] flips the lock and toggles each device
//! - [`LockManager`] feeds key events from a [`KeySource`] through all of it

pub mod backends;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod event;
pub mod logger;
pub mod manager;
pub mod notify;
pub mod pattern;
pub mod registry;
pub mod toggle;

pub use config::Config;
pub use controller::{LockController, ToggleOutcome};
pub use device::{DeviceDescriptor, DeviceEnumerator, HidCaps, HidInterface};
pub use error::{Result, SageError};
pub use event::{KeyEvent, VolumeKey};
pub use manager::{KeySource, LockManager};
pub use notify::{LogNotifier, Notifier};
pub use pattern::{MatchResult, PatternDetector};
pub use registry::DeviceRegistry;
pub use toggle::{DeviceToggler, PnpUtilToggler};
