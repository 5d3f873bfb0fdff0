//! Enabling and disabling devices.
//!
//! [`DeviceToggler`] is the seam between the lock logic and the OS. The
//! production implementation, [`PnpUtilToggler`], shells out to `pnputil.exe`
//! and waits for it synchronously. There is no timeout: a hung utility stalls
//! the event loop until it returns.

use crate::error::{Result, SageError};
use std::process::Command;
use tracing::debug;

/// Default device-management utility.
pub const DEFAULT_TOOL: &str = "pnputil.exe";

pub trait DeviceToggler {
    fn set_device_enabled(&mut self, device_id: &str, enabled: bool) -> Result<()>;
}

/// Runs `<tool> /enable-device <id>` or `<tool> /disable-device <id>`.
#[derive(Debug, Clone)]
pub struct PnpUtilToggler {
    tool: String,
}

impl Default for PnpUtilToggler {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl PnpUtilToggler {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Build the command line without running it.
    pub fn command(&self, device_id: &str, enabled: bool) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.arg(if enabled { "/enable-device" } else { "/disable-device" })
            .arg(device_id);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

impl DeviceToggler for PnpUtilToggler {
    fn set_device_enabled(&mut self, device_id: &str, enabled: bool) -> Result<()> {
        let mut cmd = self.command(device_id, enabled);
        debug!(tool = %self.tool, device_id, enabled, "running device toggle");

        let status = cmd.status().map_err(|source| SageError::ToggleSpawn {
            tool: self.tool.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(SageError::ToggleExit {
                tool: self.tool.clone(),
                device_id: device_id.to_string(),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn disable_command_line() {
        let t = PnpUtilToggler::default();
        let cmd = t.command(r"HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000", false);
        assert_eq!(cmd.get_program(), OsStr::new("pnputil.exe"));
        assert_eq!(
            args(&cmd),
            vec![
                OsStr::new("/disable-device"),
                OsStr::new(r"HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000"),
            ]
        );
    }

    #[test]
    fn enable_command_line_uses_configured_tool() {
        let t = PnpUtilToggler::new(r"C:\Windows\System32\pnputil.exe");
        let cmd = t.command("HID\\X\\1", true);
        assert_eq!(cmd.get_program(), OsStr::new(r"C:\Windows\System32\pnputil.exe"));
        assert_eq!(args(&cmd)[0], OsStr::new("/enable-device"));
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let mut t = PnpUtilToggler::new("sagelock-no-such-tool-7f3a");
        let err = t.set_device_enabled("HID\\X\\1", false).unwrap_err();
        assert!(matches!(err, SageError::ToggleSpawn { .. }));
    }
}
