//! Platform backends for `sagelock`.
//!
//! Implementations of [`DeviceEnumerator`](crate::device::DeviceEnumerator),
//! [`KeySource`](crate::manager::KeySource) and
//! [`Notifier`](crate::notify::Notifier) for real hardware.
//!
//! # Feature flags
//! - **`hid`** — enables the Windows HID/Raw Input backend (default).
//!
//! On other platforms the portable lock logic still builds and is testable, but
//! there is no enumerator or key source.

use crate::config::SoundConfig;
use crate::device::DeviceEnumerator;
use crate::notify::{LogNotifier, Notifier};

#[cfg(all(feature = "hid", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "hid", target_os = "windows"))))]
pub mod windows;

/// Enumerator for the current platform, if one exists.
pub fn platform_enumerator() -> Option<Box<dyn DeviceEnumerator>> {
    #[cfg(all(feature = "hid", target_os = "windows"))]
    {
        Some(Box::new(windows::HidApiEnumerator::new()))
    }

    #[cfg(not(all(feature = "hid", target_os = "windows")))]
    {
        None
    }
}

/// Sound feedback where available and enabled, log-only otherwise.
pub fn platform_notifier(cfg: &SoundConfig) -> Box<dyn Notifier> {
    #[cfg(all(feature = "hid", target_os = "windows"))]
    {
        if cfg.enabled {
            return Box::new(windows::SoundNotifier::new(cfg));
        }
    }

    #[cfg(not(all(feature = "hid", target_os = "windows")))]
    {
        let _ = cfg;
    }

    Box::new(LogNotifier)
}
