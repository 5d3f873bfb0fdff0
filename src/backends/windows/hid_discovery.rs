//! Windows HID enumeration.
//!
//! [`HidApiEnumerator`] implements [`DeviceEnumerator`] on top of `hidapi`:
//!
//! - `hidapi` lists every present HID top-level collection (one entry per
//!   `ColNN` interface)
//! - caps are re-read through HIDP ([`hidp_caps::query_caps`]) rather than trusted
//!   from the `hidapi` entry, so a collection that cannot be opened is dropped
//! - the stable id comes from the interface path (see
//!   [`instance_id_from_interface_path`](crate::device::instance_id_from_interface_path))

#![cfg(target_os = "windows")]

use crate::backends::windows::hidp_caps;
use crate::device::{DeviceEnumerator, HidCaps, HidInterface};
use crate::error::{Result, SageError};
use hidapi::{DeviceInfo, HidApi};

/// `hidapi` + HIDP backed enumerator.
///
/// Construction never fails; an unavailable `hidapi` surfaces from
/// [`DeviceEnumerator::interfaces`] so discovery can fail open.
#[derive(Debug, Default)]
pub struct HidApiEnumerator;

impl HidApiEnumerator {
    pub fn new() -> Self {
        HidApiEnumerator
    }
}

fn interface(info: &DeviceInfo) -> HidInterface {
    HidInterface {
        path: info.path().to_string_lossy().to_string(),
        vendor_id: info.vendor_id(),
        product_id: info.product_id(),
        product_string: info.product_string().map(|s| s.to_string()),
    }
}

impl DeviceEnumerator for HidApiEnumerator {
    fn interfaces(&self) -> Result<Vec<HidInterface>> {
        let api = HidApi::new().map_err(|e| SageError::Enumeration(e.to_string()))?;
        Ok(api.device_list().map(interface).collect())
    }

    fn query_caps(&self, iface: &HidInterface) -> Result<HidCaps> {
        hidp_caps::query_caps(&iface.path)
    }
}
