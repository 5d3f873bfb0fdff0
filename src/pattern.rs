//! Volume up/down/up/down detector.
//!
//! The detector keeps the last four qualifying keys in fixed slots and only
//! compares them against the unlock pattern when the fourth slot is written.
//! It is a phase-locked check, not a sliding window: `Down, Up, Down, Up, Down`
//! never matches, because the run that would complete the pattern started at
//! slot 1.
//!
//! ## Timing
//! An event arriving more than [`SEQUENCE_WINDOW_MS`] after the previous one
//! starts a fresh run at slot 0. Within the window, events advance one slot at
//! a time. Only the gap to the *previous* event matters; a run of four presses
//! may take longer than 500 ms in total as long as no single gap exceeds it.
//!
//! After slot 3 is written the next event always lands in slot 0 again, so
//! every match needs four fresh events.

use crate::event::{KeyEvent, VolumeKey};

/// Largest gap between two events that still continues the current run.
pub const SEQUENCE_WINDOW_MS: u64 = 500;

/// The one recognized pattern.
pub const UNLOCK_PATTERN: [VolumeKey; 4] = [
    VolumeKey::Up,
    VolumeKey::Down,
    VolumeKey::Up,
    VolumeKey::Down,
];

/// Which slot the next event is written to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    First,
    Second,
    Third,
    Fourth,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
            Slot::Third => 2,
            Slot::Fourth => 3,
        }
    }

    fn next(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::Third,
            Slot::Third => Slot::Fourth,
            Slot::Fourth => Slot::First,
        }
    }
}

/// Outcome of one [`PatternDetector::ingest`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
}

#[derive(Debug, Default)]
pub struct PatternDetector {
    history: [Option<VolumeKey>; 4],
    next: Slot,
    last_at_ms: Option<u64>,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one key and report whether it completed the pattern.
    ///
    /// Never fails. Timestamps that go backwards are treated as a zero gap.
    pub fn ingest(&mut self, key: VolumeKey, at_ms: u64) -> MatchResult {
        let slot = match self.last_at_ms {
            Some(last) if at_ms.saturating_sub(last) <= SEQUENCE_WINDOW_MS => self.next,
            _ => Slot::First,
        };
        self.last_at_ms = Some(at_ms);
        self.history[slot.index()] = Some(key);
        self.next = slot.next();

        if slot != Slot::Fourth {
            return MatchResult { matched: false };
        }

        let matched = self.history == UNLOCK_PATTERN.map(Some);
        if matched {
            tracing::debug!("unlock pattern completed");
        }
        MatchResult { matched }
    }

    #[inline]
    pub fn ingest_event(&mut self, event: KeyEvent) -> MatchResult {
        self.ingest(event.key, event.at_ms)
    }

    /// Slot the next event within the window will be written to.
    pub fn next_slot(&self) -> Slot {
        self.next
    }

    pub fn history(&self) -> &[Option<VolumeKey>; 4] {
        &self.history
    }
}
