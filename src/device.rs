//! HID interface descriptions and the enumeration seam.
//!
//! A [`DeviceEnumerator`] lists HID interfaces, answers capability queries for
//! them, and resolves their stable PnP instance id. [`DeviceRegistry`](crate::registry::DeviceRegistry)
//! drives it once at startup and keeps only touch digitizers.
//!
//! ## Identity
//! The id handed to the device-management utility is the PnP *device instance
//! id* of the HID collection, e.g. `HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000`.
//! It is stable across reboots and reconnects on the same port. Interface paths
//! (`\\?\hid#...#{guid}`) are not accepted by the utility; see
//! [`instance_id_from_interface_path`].

use crate::error::{Result, SageError};
use serde::Serialize;

/// HID usage page: Digitizers.
pub const USAGE_PAGE_DIGITIZER: u16 = 0x0D;
/// Digitizer usage: Touch Screen.
pub const USAGE_DIGITIZER_TOUCH_SCREEN: u16 = 0x04;
/// Digitizer usage: Multi-point Digitizer.
pub const USAGE_DIGITIZER_MULTI_POINT: u16 = 0x0C;
/// Digitizer usage: Capacitive Heat Map Digitizer (Surface touch screens report this).
pub const USAGE_DIGITIZER_HEAT_MAP: u16 = 0x0F;

/// Top-level collection usage of a HID interface, as reported by `HidP_GetCaps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HidCaps {
    pub usage_page: u16,
    pub usage: u16,
}

impl HidCaps {
    pub fn new(usage_page: u16, usage: u16) -> Self {
        Self { usage_page, usage }
    }

    /// `true` for touch digitizers subject to locking.
    pub fn is_touch_digitizer(&self) -> bool {
        self.usage_page == USAGE_PAGE_DIGITIZER
            && matches!(
                self.usage,
                USAGE_DIGITIZER_HEAT_MAP | USAGE_DIGITIZER_TOUCH_SCREEN | USAGE_DIGITIZER_MULTI_POINT
            )
    }
}

/// One HID interface as listed by the platform, before any capability query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HidInterface {
    /// OS interface path. Opaque; used to open the interface.
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub product_string: Option<String>,
}

/// A touch device retained for toggling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub device_id: String,
    pub usage_page: u16,
    pub usage: u16,
}

/// Platform enumeration capability.
///
/// The production implementation lives in `backends::windows`; tests supply a
/// fixed list.
pub trait DeviceEnumerator {
    /// List all present HID interfaces.
    ///
    /// `Err` means the enumeration mechanism itself is unavailable.
    fn interfaces(&self) -> Result<Vec<HidInterface>>;

    /// Open `iface` for a capability query (no exclusive access) and read its
    /// top-level caps.
    fn query_caps(&self, iface: &HidInterface) -> Result<HidCaps>;

    /// Resolve the stable PnP instance id of `iface`.
    fn resolve_id(&self, iface: &HidInterface) -> Result<String> {
        instance_id_from_interface_path(&iface.path)
    }
}

/// Derive a PnP device instance id from a device interface path.
///
/// `\\?\HID#VID_045E&PID_0921&Col01#7&2a1c&0&0000#{4d1e55b2-f16f-11cf-88cb-001111000030}`
/// becomes `HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000`.
///
/// The interface path embeds the instance id with `\` replaced by `#`, followed
/// by the interface class GUID. Instance ids are case-insensitive; the result is
/// upper-cased to match what the PnP manager reports.
pub fn instance_id_from_interface_path(path: &str) -> Result<String> {
    let bad = || SageError::DeviceId(path.to_string());

    let body = path
        .strip_prefix(r"\\?\")
        .or_else(|| path.strip_prefix(r"\\.\"))
        .ok_or_else(bad)?;

    // Drop the trailing `#{class-guid}`.
    let body = match body.rfind("#{") {
        Some(i) => &body[..i],
        None => body,
    };

    let parts: Vec<&str> = body.split('#').collect();
    if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(bad());
    }

    Ok(parts.join("\\").to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_usages_are_accepted() {
        for u in [
            USAGE_DIGITIZER_TOUCH_SCREEN,
            USAGE_DIGITIZER_MULTI_POINT,
            USAGE_DIGITIZER_HEAT_MAP,
        ] {
            assert!(HidCaps::new(USAGE_PAGE_DIGITIZER, u).is_touch_digitizer());
        }
    }

    #[test]
    fn pen_and_non_digitizer_are_rejected() {
        // Digitizer / Pen
        assert!(!HidCaps::new(USAGE_PAGE_DIGITIZER, 0x02).is_touch_digitizer());
        // Digitizer / Touch Pad
        assert!(!HidCaps::new(USAGE_PAGE_DIGITIZER, 0x05).is_touch_digitizer());
        // Generic Desktop / Mouse with a touch-screen usage number
        assert!(!HidCaps::new(0x01, USAGE_DIGITIZER_TOUCH_SCREEN).is_touch_digitizer());
    }

    #[test]
    fn instance_id_from_collection_path() {
        let path = r"\\?\HID#VID_045E&PID_0921&Col01#7&2a1c&0&0000#{4d1e55b2-f16f-11cf-88cb-001111000030}";
        assert_eq!(
            instance_id_from_interface_path(path).unwrap(),
            r"HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000"
        );
    }

    #[test]
    fn instance_id_from_lowercase_hidapi_path() {
        let path = r"\\?\hid#i2c_hid&col02#5&1e3c8a1&0&0001#{4d1e55b2-f16f-11cf-88cb-001111000030}\kbd";
        // Reference-string suffixes after the GUID are dropped with it.
        assert_eq!(
            instance_id_from_interface_path(path).unwrap(),
            r"HID\I2C_HID&COL02\5&1E3C8A1&0&0001"
        );
    }

    #[test]
    fn malformed_paths_are_rejected() {
        assert!(instance_id_from_interface_path("").is_err());
        assert!(instance_id_from_interface_path("/dev/hidraw0").is_err());
        assert!(instance_id_from_interface_path(r"\\?\HID#only-two").is_err());
        assert!(instance_id_from_interface_path(r"\\?\HID##7&1&0").is_err());
    }
}
