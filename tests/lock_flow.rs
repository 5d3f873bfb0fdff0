//! End-to-end: scripted volume keys → detector → controller → fake devices.

use std::cell::RefCell;
use std::rc::Rc;

use sagelock::device::{USAGE_DIGITIZER_TOUCH_SCREEN, USAGE_PAGE_DIGITIZER};
use sagelock::{
    DeviceEnumerator, DeviceRegistry, DeviceToggler, HidCaps, HidInterface, KeyEvent, KeySource,
    LockController, LockManager, Notifier, Result, SageError, VolumeKey,
};
use VolumeKey::{Down, Up};

const TOUCH_PATH: &str =
    r"\\?\HID#VID_045E&PID_0921&Col01#7&2a1c&0&0000#{4d1e55b2-f16f-11cf-88cb-001111000030}";
const KEYBOARD_PATH: &str =
    r"\\?\HID#VID_046D&PID_C52B&MI_00#8&3b1&0&0000#{4d1e55b2-f16f-11cf-88cb-001111000030}";
const TOUCH_ID: &str = r"HID\VID_045E&PID_0921&COL01\7&2A1C&0&0000";

struct Bench;

impl DeviceEnumerator for Bench {
    fn interfaces(&self) -> Result<Vec<HidInterface>> {
        Ok([TOUCH_PATH, KEYBOARD_PATH]
            .into_iter()
            .map(|p| HidInterface {
                path: p.to_string(),
                ..Default::default()
            })
            .collect())
    }

    fn query_caps(&self, iface: &HidInterface) -> Result<HidCaps> {
        match iface.path.as_str() {
            TOUCH_PATH => Ok(HidCaps::new(USAGE_PAGE_DIGITIZER, USAGE_DIGITIZER_TOUCH_SCREEN)),
            KEYBOARD_PATH => Ok(HidCaps::new(0x01, 0x06)),
            _ => Err(SageError::DeviceOpen {
                path: iface.path.clone(),
                code: 2,
            }),
        }
    }
}

type Log = Rc<RefCell<Vec<String>>>;

struct FakeToggler(Log);

impl DeviceToggler for FakeToggler {
    fn set_device_enabled(&mut self, device_id: &str, enabled: bool) -> Result<()> {
        self.0
            .borrow_mut()
            .push(format!("{} {device_id}", if enabled { "enable" } else { "disable" }));
        Ok(())
    }
}

struct FakeNotifier(Log);

impl Notifier for FakeNotifier {
    fn notify(&mut self, enabled: bool) {
        self.0.borrow_mut().push(format!("notify {enabled}"));
    }
}

struct Script(Vec<(VolumeKey, u64)>);

impl KeySource for Script {
    fn run(&mut self, sink: &mut dyn FnMut(KeyEvent)) -> Result<()> {
        for &(key, at) in &self.0 {
            sink(KeyEvent::new(key, at));
        }
        Ok(())
    }
}

fn manager(log: &Log) -> LockManager<FakeToggler, FakeNotifier> {
    let registry = DeviceRegistry::discover(&Bench);
    LockManager::new(LockController::new(
        &registry,
        FakeToggler(log.clone()),
        FakeNotifier(log.clone()),
    ))
}

#[test]
fn lock_then_unlock() {
    let log: Log = Rc::default();
    let mut m = manager(&log);

    let mut script = Script(vec![
        (Up, 1_000),
        (Down, 1_100),
        (Up, 1_200),
        (Down, 1_300),
        // Idle, then the same pattern again.
        (Up, 5_000),
        (Down, 5_150),
        (Up, 5_300),
        (Down, 5_450),
    ]);
    m.run(&mut script).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            format!("disable {TOUCH_ID}"),
            "notify false".to_string(),
            format!("enable {TOUCH_ID}"),
            "notify true".to_string(),
        ]
    );
    assert!(!m.controller().is_locked());
}

#[test]
fn broken_sequence_does_nothing() {
    let log: Log = Rc::default();
    let mut m = manager(&log);

    let mut script = Script(vec![(Up, 0), (Down, 600), (Up, 700), (Down, 800)]);
    m.run(&mut script).unwrap();

    assert!(log.borrow().is_empty());
    assert!(!m.controller().is_locked());
}

#[test]
fn only_the_touch_screen_is_registered() {
    let log: Log = Rc::default();
    let m = manager(&log);
    let ids: Vec<&str> = m
        .controller()
        .devices()
        .iter()
        .map(|d| d.device_id.as_str())
        .collect();
    assert_eq!(ids, vec![TOUCH_ID]);
}

#[test]
fn handle_reports_outcome_on_the_completing_event() {
    let log: Log = Rc::default();
    let mut m = manager(&log);

    assert!(m.handle(KeyEvent::new(Up, 0)).is_none());
    assert!(m.handle(KeyEvent::new(Down, 100)).is_none());
    assert!(m.handle(KeyEvent::new(Up, 200)).is_none());
    let out = m.handle(KeyEvent::new(Down, 300)).expect("pattern completes");
    assert!(out.locked);
    assert_eq!((out.succeeded, out.failed), (1, 0));

    // Cursor is back at slot 0; one more key does not re-trigger.
    assert!(m.handle(KeyEvent::new(Up, 301)).is_none());
    assert!(m.controller().is_locked());
}
