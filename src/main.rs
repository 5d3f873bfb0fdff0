use std::path::PathBuf;
use std::process::ExitCode;

use sagelock::backends;
use sagelock::registry::{DiscoveryRecord, DropStage};
use sagelock::{Config, DeviceRegistry, Result, SageError};

const USAGE: &str = "\
usage: sagelock [--config <path>] [--list-devices [--json]]

  (no flags)        lock/unlock touch screens with volume up, down, up, down
  --list-devices    show every HID interface and whether it would be locked
  --json            with --list-devices, print JSON
  --config <path>   read settings from <path> instead of the default location
";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    list_devices: bool,
    json: bool,
}

fn parse_args() -> std::result::Result<Option<Args>, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--config" => {
                let p = it.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(p));
            }
            "--list-devices" => args.list_devices = true,
            "--json" => args.json = true,
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Some(args))
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(a)) => a,
        Ok(None) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("sagelock: {msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let cfg = match Config::resolve(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("sagelock: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = sagelock::logger::try_init(&cfg.log) {
        eprintln!("sagelock: {e}");
    }

    let result = if args.list_devices {
        list_devices(args.json)
    } else {
        run(&cfg)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "sagelock stopped");
            ExitCode::FAILURE
        }
    }
}

fn list_devices(json: bool) -> Result<()> {
    let enumerator = backends::platform_enumerator()
        .ok_or_else(|| SageError::Enumeration("no HID backend for this platform".into()))?;
    let (_, records) = DeviceRegistry::discover_with_debug(enumerator.as_ref());

    if json {
        let text = serde_json::to_string_pretty(&records)
            .map_err(|e| SageError::Io(std::io::Error::other(e)))?;
        println!("{text}");
        return Ok(());
    }

    for r in &records {
        println!("{}", describe(r));
    }
    let kept = records.iter().filter(|r| r.retained()).count();
    println!("{} HID interface(s), {} touch device(s)", records.len(), kept);
    Ok(())
}

fn describe(r: &DiscoveryRecord) -> String {
    let caps = match r.caps {
        Some(c) => format!("up=0x{:02x} u=0x{:02x}", c.usage_page, c.usage),
        None => "up=?    u=?   ".to_string(),
    };
    let verdict = match &r.drop_stage {
        None => format!("TOUCH {}", r.device_id.as_deref().unwrap_or("")),
        Some(DropStage::FilterRejected) => "skip".to_string(),
        Some(DropStage::CapsFailed(why)) => format!("skip ({why})"),
        Some(DropStage::IdUnresolved(why)) => format!("touch, unusable ({why})"),
    };
    format!(
        "VID:PID={:04x}:{:04x} {caps} prod={:?} {verdict}\n    {}",
        r.interface.vendor_id, r.interface.product_id, r.interface.product_string, r.interface.path
    )
}

#[cfg(all(feature = "hid", target_os = "windows"))]
fn run(cfg: &Config) -> Result<()> {
    use sagelock::backends::windows::{instance, HidApiEnumerator, InstanceGuard, RawInputSource};
    use sagelock::{LockController, LockManager, PnpUtilToggler};

    let _guard = match InstanceGuard::acquire() {
        Ok(g) => g,
        Err(SageError::AlreadyRunning) => {
            tracing::warn!("another instance is already running");
            instance::show_already_running();
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let registry = DeviceRegistry::discover(&HidApiEnumerator::new());
    if registry.is_empty() {
        tracing::warn!("no touch devices found; the lock will have no effect");
    }

    let controller = LockController::new(
        &registry,
        PnpUtilToggler::new(cfg.toggle.tool.clone()),
        backends::platform_notifier(&cfg.sound),
    );
    let mut manager = LockManager::new(controller);
    manager.run(&mut RawInputSource::new())
}

#[cfg(not(all(feature = "hid", target_os = "windows")))]
fn run(_cfg: &Config) -> Result<()> {
    Err(SageError::Platform {
        call: "raw keyboard input (Windows only)",
        code: 0,
    })
}
