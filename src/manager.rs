//! Event-processing path.
//!
//! [`LockManager`] ties a [`PatternDetector`] to a [`LockController`]. Events are
//! handled strictly one at a time: ingest, check, and (on a match) the device
//! toggles all complete before the next event is looked at. The key source
//! naturally queues behind a slow toggle.

use crate::controller::{LockController, ToggleOutcome};
use crate::error::Result;
use crate::event::KeyEvent;
use crate::notify::Notifier;
use crate::pattern::PatternDetector;
use crate::toggle::DeviceToggler;
use tracing::trace;

/// Producer of qualifying key events.
///
/// `run` blocks, calling `sink` once per event in arrival order, until the
/// source ends (message loop quit, script exhausted).
pub trait KeySource {
    fn run(&mut self, sink: &mut dyn FnMut(KeyEvent)) -> Result<()>;
}

pub struct LockManager<T, N> {
    detector: PatternDetector,
    controller: LockController<T, N>,
}

impl<T: DeviceToggler, N: Notifier> LockManager<T, N> {
    pub fn new(controller: LockController<T, N>) -> Self {
        Self {
            detector: PatternDetector::new(),
            controller,
        }
    }

    /// Feed one event. Returns the toggle outcome if it completed the pattern.
    pub fn handle(&mut self, event: KeyEvent) -> Option<ToggleOutcome> {
        trace!(key = ?event.key, at_ms = event.at_ms, "volume key");
        if self.detector.ingest_event(event).matched {
            Some(self.controller.on_match())
        } else {
            None
        }
    }

    /// Pump `source` until it ends.
    pub fn run(&mut self, source: &mut dyn KeySource) -> Result<()> {
        source.run(&mut |event| {
            self.handle(event);
        })
    }

    pub fn controller(&self) -> &LockController<T, N> {
        &self.controller
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }
}
