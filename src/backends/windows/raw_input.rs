//! Windows Raw Input keyboard source.
//!
//! [`RawInputSource`] creates a message-only window, registers it for keyboard
//! Raw Input with `RIDEV_INPUTSINK` (delivered even without focus) and pumps the
//! thread's message queue. Each `WM_INPUT` is parsed on the spot; volume-key
//! key-downs become [`KeyEvent`]s, everything else is ignored.
//!
//! ## Conventions
//! - Timestamps are milliseconds since the source was created (monotonic).
//! - `WM_INPUT` is handled in the pump itself, then dispatched to
//!   `DefWindowProcW` so the OS releases the input buffer.

#![cfg(target_os = "windows")]

use core::ffi::c_void;
use std::ptr::{null, null_mut};
use std::time::Instant;

use windows_sys::Win32::Foundation::{GetLastError, HWND};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::Input::*;
use windows_sys::Win32::UI::WindowsAndMessaging::*;

use super::to_wide;
use crate::error::{Result, SageError};
use crate::event::{classify_key, KeyEvent, VolumeKey};
use crate::manager::KeySource;

const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_KEYBOARD: u16 = 0x06;
const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;

const CLASS_NAME: &str = "SageLockRawInput";

pub struct RawInputSource {
    started: Instant,
}

impl Default for RawInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInputSource {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl KeySource for RawInputSource {
    fn run(&mut self, sink: &mut dyn FnMut(KeyEvent)) -> Result<()> {
        let hwnd = create_message_window()?;
        if let Err(e) = register_keyboard(hwnd) {
            unsafe { DestroyWindow(hwnd) };
            return Err(e);
        }
        tracing::info!("listening for volume keys");

        let mut msg: MSG = unsafe { core::mem::zeroed() };
        let result = loop {
            let r = unsafe { GetMessageW(&mut msg, null_mut(), 0, 0) };
            if r == 0 {
                break Ok(()); // WM_QUIT
            }
            if r == -1 {
                break Err(last_error("GetMessageW"));
            }

            if msg.message == WM_INPUT {
                if let Some(key) = read_wm_input(msg.lParam) {
                    sink(KeyEvent::new(key, self.now_ms()));
                }
            }

            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        };

        unsafe { DestroyWindow(hwnd) };
        result
    }
}

fn last_error(call: &'static str) -> SageError {
    SageError::Platform {
        call,
        code: unsafe { GetLastError() },
    }
}

fn create_message_window() -> Result<HWND> {
    let class_name = to_wide(CLASS_NAME);
    let title = to_wide("SageLock");

    unsafe {
        let hinstance = GetModuleHandleW(null());

        let mut wc: WNDCLASSEXW = core::mem::zeroed();
        wc.cbSize = core::mem::size_of::<WNDCLASSEXW>() as u32;
        wc.lpfnWndProc = Some(DefWindowProcW);
        wc.hInstance = hinstance;
        wc.lpszClassName = class_name.as_ptr();

        if RegisterClassExW(&wc) == 0 && GetLastError() != ERROR_CLASS_ALREADY_EXISTS {
            return Err(last_error("RegisterClassExW"));
        }

        let hwnd = CreateWindowExW(
            0,
            class_name.as_ptr(),
            title.as_ptr(),
            0,
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            null_mut(),
            hinstance,
            null(),
        );
        if hwnd.is_null() {
            return Err(last_error("CreateWindowExW"));
        }
        Ok(hwnd)
    }
}

fn register_keyboard(hwnd: HWND) -> Result<()> {
    let rid = RAWINPUTDEVICE {
        usUsagePage: HID_USAGE_PAGE_GENERIC,
        usUsage: HID_USAGE_GENERIC_KEYBOARD,
        dwFlags: RIDEV_INPUTSINK,
        hwndTarget: hwnd,
    };
    let ok = unsafe {
        RegisterRawInputDevices(&rid, 1, core::mem::size_of::<RAWINPUTDEVICE>() as u32)
    };
    if ok == 0 {
        return Err(last_error("RegisterRawInputDevices"));
    }
    Ok(())
}

/// Parse a `WM_INPUT` lparam into a volume key (if applicable).
fn read_wm_input(lparam: isize) -> Option<VolumeKey> {
    unsafe {
        // Query size
        let mut size: u32 = 0;
        let r0 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            null_mut(),
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r0 == u32::MAX || size == 0 {
            return None;
        }

        // Read buffer
        let mut buf = vec![0u8; size as usize];
        let r1 = GetRawInputData(
            lparam as _,
            RID_INPUT,
            buf.as_mut_ptr() as *mut c_void,
            &mut size,
            core::mem::size_of::<RAWINPUTHEADER>() as u32,
        );
        if r1 == u32::MAX {
            return None;
        }

        read_keyboard_bytes(&buf)
    }
}

/// Parse a raw `RID_INPUT` payload. Non-keyboard packets and short buffers yield `None`.
fn read_keyboard_bytes(buf: &[u8]) -> Option<VolumeKey> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
    let need = hdr_sz + core::mem::size_of::<RAWKEYBOARD>();
    if buf.len() < need {
        return None;
    }

    unsafe {
        let hdr: RAWINPUTHEADER = core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        if hdr.dwType != RIM_TYPEKEYBOARD {
            return None;
        }
        let kbd: RAWKEYBOARD =
            core::ptr::read_unaligned(buf.as_ptr().add(hdr_sz) as *const RAWKEYBOARD);
        classify_key(kbd.VKey, kbd.Message)
    }
}
