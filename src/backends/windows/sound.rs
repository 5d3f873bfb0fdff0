//! Audible lock/unlock cue via `PlaySoundW`.

#![cfg(target_os = "windows")]

use std::path::PathBuf;
use std::ptr::null_mut;

use tracing::{info, warn};
use windows_sys::Win32::Media::Audio::{PlaySoundW, SND_ASYNC, SND_FILENAME};

use super::to_wide;
use crate::config::SoundConfig;
use crate::notify::Notifier;

/// Plays one wav on lock and another on unlock. Playback is asynchronous.
#[derive(Debug, Clone)]
pub struct SoundNotifier {
    lock_sound: PathBuf,
    unlock_sound: PathBuf,
}

impl SoundNotifier {
    pub fn new(cfg: &SoundConfig) -> Self {
        Self {
            lock_sound: cfg.lock_sound.clone(),
            unlock_sound: cfg.unlock_sound.clone(),
        }
    }
}

impl Notifier for SoundNotifier {
    fn notify(&mut self, enabled: bool) {
        let file = if enabled {
            &self.unlock_sound
        } else {
            &self.lock_sound
        };
        info!(locked = !enabled, "touch lock changed");

        let wide = to_wide(file);
        let ok = unsafe { PlaySoundW(wide.as_ptr(), null_mut(), SND_FILENAME | SND_ASYNC) };
        if ok == 0 {
            warn!(file = %file.display(), "PlaySoundW failed");
        }
    }
}
