#![cfg(target_os = "windows")]
//! Windows HIDP top-level caps query.
//!
//! Opens a HID interface path for a capability query only, reads its preparsed
//! data and returns the top-level collection's usage page and usage
//! (`HIDP_CAPS::UsagePage` / `HIDP_CAPS::Usage`).
//!
//! ## Notes
//! - The handle is opened with **zero** desired access first. That is enough for
//!   `HidD_GetPreparsedData` and works on interfaces the OS keeps open
//!   exclusively (keyboards, mice, touch screens). `GENERIC_READ` is the fallback.
//! - Handle and preparsed data are released before returning.
//!
//! ## Dependencies
//! Requires `windows-sys` with HID + FileSystem features (see Cargo.toml).

use core::mem::MaybeUninit;

use crate::device::HidCaps;
use crate::error::{Result, SageError};

use super::to_wide;

use windows_sys::Win32::Devices::HumanInterfaceDevice::*;
use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, GENERIC_READ, HANDLE, INVALID_HANDLE_VALUE, NTSTATUS,
};
use windows_sys::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};

const STATUS_SUCCESS: NTSTATUS = HIDP_STATUS_SUCCESS;

/// Closes the OS handle and frees preparsed data on every exit path.
struct QueryHandle {
    handle: HANDLE,
    ppd: PHIDP_PREPARSED_DATA,
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        unsafe {
            if self.ppd != 0 {
                HidD_FreePreparsedData(self.ppd);
                self.ppd = 0;
            }
            if !self.handle.is_null() && self.handle != INVALID_HANDLE_VALUE {
                CloseHandle(self.handle);
                self.handle = std::ptr::null_mut();
            }
        }
    }
}

/// Read the top-level usage page/usage of the HID interface at `path`.
pub fn query_caps(path: &str) -> Result<HidCaps> {
    let handle = open_query_handle(path).map_err(|code| SageError::DeviceOpen {
        path: path.to_string(),
        code,
    })?;
    let mut q = QueryHandle { handle, ppd: 0 };

    let ok = unsafe { HidD_GetPreparsedData(q.handle, &mut q.ppd) };
    if ok == 0 || q.ppd == 0 {
        return Err(SageError::Caps {
            path: path.to_string(),
            reason: format!("HidD_GetPreparsedData failed (os error {})", unsafe {
                GetLastError()
            }),
        });
    }

    let mut caps = MaybeUninit::<HIDP_CAPS>::uninit();
    let status = unsafe { HidP_GetCaps(q.ppd, caps.as_mut_ptr()) };
    if status != STATUS_SUCCESS {
        return Err(SageError::Caps {
            path: path.to_string(),
            reason: format!("HidP_GetCaps returned {status:#010x}"),
        });
    }
    let caps = unsafe { caps.assume_init() };

    Ok(HidCaps::new(caps.UsagePage, caps.Usage))
}

/// Open a Windows file handle for a HID interface path without exclusive access.
///
/// ### Errors
/// Returns `Err(GetLastError())` on failure.
fn open_query_handle(path: &str) -> core::result::Result<HANDLE, u32> {
    use std::ptr::{null, null_mut};

    let wide = to_wide(path);

    let try_open = |access: u32| unsafe {
        CreateFileW(
            wide.as_ptr(),
            access,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            null(),
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL,
            null_mut(),
        )
    };

    let mut handle = try_open(0);
    if handle == INVALID_HANDLE_VALUE {
        handle = try_open(GENERIC_READ);
    }

    if handle == INVALID_HANDLE_VALUE {
        Err(unsafe { GetLastError() })
    } else {
        Ok(handle)
    }
}
