#![cfg(target_os = "windows")]

//! Windows backends.
//!
//! Everything that touches Win32 lives here:
//! - **HID** enumeration via `hidapi` and top-level caps via HIDP ([`HidApiEnumerator`])
//! - **Raw Input** keyboard source on a message-only window ([`RawInputSource`])
//! - **Single-instance** named mutex ([`InstanceGuard`])
//! - **Sound** feedback via `PlaySoundW` ([`SoundNotifier`])
//!
//! The portable lock logic only sees these through the crate's traits.

pub mod hid_discovery;
pub mod hidp_caps;
pub mod instance;
pub mod raw_input;
pub mod sound;

pub use hid_discovery::HidApiEnumerator;
pub use instance::InstanceGuard;
pub use raw_input::RawInputSource;
pub use sound::SoundNotifier;

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

/// UTF-16 + NUL.
pub(crate) fn to_wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}
