//! Lock state and fan-out to devices.
//!
//! [`LockController`] owns the single process-wide lock flag. Each
//! [`on_match`](LockController::on_match) flips it and pushes the new state to
//! every registered touch device in discovery order. A device that fails to
//! toggle is logged and skipped; the rest are still attempted and nothing is
//! retried.

use crate::device::DeviceDescriptor;
use crate::notify::Notifier;
use crate::registry::DeviceRegistry;
use crate::toggle::DeviceToggler;
use tracing::{info, warn};

/// Result of one lock flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Lock state after the flip.
    pub locked: bool,
    /// Devices the toggler accepted.
    pub succeeded: usize,
    /// Devices the toggler reported an error for.
    pub failed: usize,
}

pub struct LockController<T, N> {
    devices: Vec<DeviceDescriptor>,
    toggler: T,
    notifier: N,
    locked: bool,
}

impl<T: DeviceToggler, N: Notifier> LockController<T, N> {
    /// Start unlocked. No state carries over between runs.
    pub fn new(registry: &DeviceRegistry, toggler: T, notifier: N) -> Self {
        Self {
            devices: registry.devices().to_vec(),
            toggler,
            notifier,
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn toggler(&self) -> &T {
        &self.toggler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Flip the lock and apply it to every device.
    pub fn on_match(&mut self) -> ToggleOutcome {
        self.locked = !self.locked;
        let enabled = !self.locked;
        info!(locked = self.locked, devices = self.devices.len(), "lock toggled");

        let mut outcome = ToggleOutcome {
            locked: self.locked,
            succeeded: 0,
            failed: 0,
        };

        for dev in &self.devices {
            match self.toggler.set_device_enabled(&dev.device_id, enabled) {
                Ok(()) => outcome.succeeded += 1,
                Err(e) => {
                    warn!(device_id = %dev.device_id, enabled, error = %e, "device toggle failed");
                    outcome.failed += 1;
                }
            }
        }

        self.notifier.notify(enabled);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SageError};

    #[derive(Default)]
    struct RecordingToggler {
        calls: Vec<(String, bool)>,
        fail_on: Option<String>,
    }

    impl DeviceToggler for RecordingToggler {
        fn set_device_enabled(&mut self, device_id: &str, enabled: bool) -> Result<()> {
            self.calls.push((device_id.to_string(), enabled));
            if self.fail_on.as_deref() == Some(device_id) {
                return Err(SageError::ToggleExit {
                    tool: "pnputil.exe".into(),
                    device_id: device_id.into(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Vec<bool>);

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, enabled: bool) {
            self.0.push(enabled);
        }
    }

    fn registry(ids: &[&str]) -> DeviceRegistry {
        DeviceRegistry::from_devices(
            ids.iter()
                .map(|id| DeviceDescriptor {
                    device_id: id.to_string(),
                    usage_page: 0x0D,
                    usage: 0x04,
                })
                .collect(),
        )
    }

    #[test]
    fn first_match_locks_second_unlocks() {
        let reg = registry(&["HID\\A\\1", "HID\\B\\2"]);
        let mut c = LockController::new(&reg, RecordingToggler::default(), RecordingNotifier::default());
        assert!(!c.is_locked());

        let out = c.on_match();
        assert!(out.locked && c.is_locked());
        assert_eq!(
            c.toggler().calls,
            vec![("HID\\A\\1".to_string(), false), ("HID\\B\\2".to_string(), false)]
        );

        let out = c.on_match();
        assert!(!out.locked && !c.is_locked());
        assert_eq!(&c.toggler().calls[2..], &[("HID\\A\\1".to_string(), true), ("HID\\B\\2".to_string(), true)]);
        assert_eq!(c.notifier().0, vec![false, true]);
    }

    #[test]
    fn failing_device_does_not_stop_the_rest() {
        let reg = registry(&["HID\\A\\1", "HID\\B\\2", "HID\\C\\3"]);
        let toggler = RecordingToggler {
            fail_on: Some("HID\\B\\2".into()),
            ..Default::default()
        };
        let mut c = LockController::new(&reg, toggler, RecordingNotifier::default());

        let out = c.on_match();
        assert_eq!(out, ToggleOutcome { locked: true, succeeded: 2, failed: 1 });
        assert_eq!(c.toggler().calls.len(), 3);
        assert_eq!(c.notifier().0, vec![false]);
    }

    #[test]
    fn empty_registry_still_flips_and_notifies() {
        let reg = DeviceRegistry::default();
        let mut c = LockController::new(&reg, RecordingToggler::default(), RecordingNotifier::default());
        assert!(c.on_match().locked);
        assert!(c.toggler().calls.is_empty());
        assert_eq!(c.notifier().0, vec![false]);
    }
}
