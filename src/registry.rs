//! Touch device discovery.
//!
//! [`DeviceRegistry::discover`] runs once at startup:
//!
//! - List HID interfaces via the [`DeviceEnumerator`]
//! - Query each interface's top-level caps (no exclusive access)
//! - Keep those whose caps are a touch digitizer (see [`HidCaps::is_touch_digitizer`])
//! - Resolve the stable PnP instance id of each kept interface
//!
//! Any per-interface failure drops that interface and enumeration continues.
//! If enumeration as a whole is unavailable the registry is empty and nothing is
//! ever toggled.
//!
//! ## `discover` vs `discover_with_debug`
//! - [`DeviceRegistry::discover`] returns only the retained devices.
//! - [`DeviceRegistry::discover_with_debug`] also returns one [`DiscoveryRecord`]
//!   per listed interface, saying where along the pipeline it was dropped. This
//!   feeds `sagelock --list-devices` and does not change which devices are kept.
//!
//! Devices plugged in after startup are not picked up; the registry is never
//! refreshed.

use crate::device::{DeviceDescriptor, DeviceEnumerator, HidCaps, HidInterface};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where along the discovery pipeline an interface was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "reason", rename_all = "snake_case")]
pub enum DropStage {
    /// Opening the interface or reading its caps failed.
    CapsFailed(String),
    /// Caps were read but are not a touch digitizer.
    FilterRejected,
    /// Touch digitizer whose instance id could not be resolved.
    IdUnresolved(String),
}

/// Debug view of one listed HID interface.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryRecord {
    pub interface: HidInterface,
    pub caps: Option<HidCaps>,
    pub device_id: Option<String>,
    /// `None` means the interface was retained.
    pub drop_stage: Option<DropStage>,
}

impl DiscoveryRecord {
    pub fn retained(&self) -> bool {
        self.drop_stage.is_none()
    }
}

/// Touch devices found at startup, in discovery order. Read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceRegistry {
    /// Build a registry from an already known device list.
    pub fn from_devices(devices: Vec<DeviceDescriptor>) -> Self {
        Self { devices }
    }

    /// Enumerate once and keep the touch digitizers.
    pub fn discover(enumerator: &dyn DeviceEnumerator) -> Self {
        Self::discover_with_debug(enumerator).0
    }

    /// Debug-aware variant of [`discover`](Self::discover).
    ///
    /// Returns an empty record list when enumeration itself is unavailable.
    pub fn discover_with_debug(enumerator: &dyn DeviceEnumerator) -> (Self, Vec<DiscoveryRecord>) {
        let interfaces = match enumerator.interfaces() {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "HID enumeration unavailable; no touch devices will be locked");
                return (Self::default(), Vec::new());
            }
        };

        let mut devices = Vec::new();
        let mut records = Vec::with_capacity(interfaces.len());

        for iface in interfaces {
            let record = probe(enumerator, iface);
            if let (None, Some(caps), Some(id)) = (&record.drop_stage, record.caps, &record.device_id) {
                info!(device_id = %id, usage = caps.usage, "found touch device");
                devices.push(DeviceDescriptor {
                    device_id: id.clone(),
                    usage_page: caps.usage_page,
                    usage: caps.usage,
                });
            }
            records.push(record);
        }

        info!(
            listed = records.len(),
            touch = devices.len(),
            "HID discovery finished"
        );
        (Self { devices }, records)
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Run one interface through caps query → filter → id resolution.
fn probe(enumerator: &dyn DeviceEnumerator, iface: HidInterface) -> DiscoveryRecord {
    let mut record = DiscoveryRecord {
        interface: iface,
        caps: None,
        device_id: None,
        drop_stage: None,
    };

    let caps = match enumerator.query_caps(&record.interface) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %record.interface.path, error = %e, "skipping HID interface");
            record.drop_stage = Some(DropStage::CapsFailed(e.to_string()));
            return record;
        }
    };
    record.caps = Some(caps);

    if !caps.is_touch_digitizer() {
        debug!(
            path = %record.interface.path,
            usage_page = caps.usage_page,
            usage = caps.usage,
            "not a touch digitizer"
        );
        record.drop_stage = Some(DropStage::FilterRejected);
        return record;
    }

    match enumerator.resolve_id(&record.interface) {
        Ok(id) => record.device_id = Some(id),
        Err(e) => {
            warn!(path = %record.interface.path, error = %e, "touch digitizer without a usable device id");
            record.drop_stage = Some(DropStage::IdUnresolved(e.to_string()));
        }
    }
    record
}
