//! Key events fed to the pattern detector.
//!
//! Only two keys matter: volume up and volume down. Everything else is dropped
//! by [`classify_key`] before it reaches [`PatternDetector`](crate::pattern::PatternDetector).
//!
//! ## Timestamps
//! `KeyEvent::at_ms` is a monotonic millisecond counter. Its origin is
//! irrelevant; only differences between consecutive events are used.

use serde::Serialize;

// Local constants (these moved between windows-sys modules across versions).
pub const VK_VOLUME_DOWN: u16 = 0xAE;
pub const VK_VOLUME_UP: u16 = 0xAF;
pub const WM_KEYDOWN: u32 = 0x0100;

/// A qualifying key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum VolumeKey {
    Up,
    Down,
}

impl VolumeKey {
    /// Map a Win32 virtual-key code to a volume key.
    pub fn from_vkey(vkey: u16) -> Option<Self> {
        match vkey {
            VK_VOLUME_UP => Some(VolumeKey::Up),
            VK_VOLUME_DOWN => Some(VolumeKey::Down),
            _ => None,
        }
    }
}

/// Timestamped key-down for one of the two volume keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VolumeKey,
    /// Monotonic milliseconds.
    pub at_ms: u64,
}

impl KeyEvent {
    pub fn new(key: VolumeKey, at_ms: u64) -> Self {
        Self { key, at_ms }
    }
}

/// Input filter applied to raw keyboard packets.
///
/// `message` is the window message carried by the packet (`RAWKEYBOARD::Message`).
/// Only key-down messages for the volume keys qualify; key-ups, repeats delivered
/// as `WM_SYSKEYDOWN`, and every other key are ignored.
#[inline]
pub fn classify_key(vkey: u16, message: u32) -> Option<VolumeKey> {
    if message != WM_KEYDOWN {
        return None;
    }
    VolumeKey::from_vkey(vkey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_keydowns_qualify() {
        assert_eq!(classify_key(VK_VOLUME_UP, WM_KEYDOWN), Some(VolumeKey::Up));
        assert_eq!(classify_key(VK_VOLUME_DOWN, WM_KEYDOWN), Some(VolumeKey::Down));
    }

    #[test]
    fn key_up_and_other_keys_are_dropped() {
        const WM_KEYUP: u32 = 0x0101;
        assert_eq!(classify_key(VK_VOLUME_UP, WM_KEYUP), None);
        // VK_VOLUME_MUTE
        assert_eq!(classify_key(0xAD, WM_KEYDOWN), None);
        assert_eq!(classify_key(0x41, WM_KEYDOWN), None);
    }
}
