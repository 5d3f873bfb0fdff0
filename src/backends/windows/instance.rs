//! Single-instance guard.
//!
//! A process-wide named mutex, `Global\SAGE_LOCK_INSTANCE`, held for the life of
//! the [`InstanceGuard`]. A second process finds the name taken and must exit
//! without enumerating devices or reading input.

#![cfg(target_os = "windows")]

use std::ptr::{null, null_mut};

use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE};
use windows_sys::Win32::System::Threading::{CreateMutexW, ReleaseMutex};
use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

use super::to_wide;
use crate::error::{Result, SageError};

pub const INSTANCE_MUTEX_NAME: &str = r"Global\SAGE_LOCK_INSTANCE";

#[derive(Debug)]
pub struct InstanceGuard {
    handle: HANDLE,
}

impl InstanceGuard {
    /// Take the instance mutex.
    ///
    /// Returns [`SageError::AlreadyRunning`] if another process holds it.
    pub fn acquire() -> Result<Self> {
        let name = to_wide(INSTANCE_MUTEX_NAME);
        unsafe {
            let handle = CreateMutexW(null(), 1, name.as_ptr());
            if handle.is_null() {
                return Err(SageError::Platform {
                    call: "CreateMutexW",
                    code: GetLastError(),
                });
            }
            if GetLastError() == ERROR_ALREADY_EXISTS {
                CloseHandle(handle);
                return Err(SageError::AlreadyRunning);
            }
            Ok(Self { handle })
        }
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        unsafe {
            ReleaseMutex(self.handle);
            CloseHandle(self.handle);
        }
    }
}

/// Blocking notice shown to the user when a second copy is started.
pub fn show_already_running() {
    let text = to_wide("SageLock is already running");
    let caption = to_wide("SageLock");
    unsafe {
        MessageBoxW(null_mut(), text.as_ptr(), caption.as_ptr(), MB_OK | MB_ICONERROR);
    }
}
