//! Logging bridge for term-profiles.
//!
//! Routes every `log::info!()` / `log::warn!()` / ... call to
//! `<temp dir>/term_profiles_debug.log`, keeping stdout clean for command
//! output. When `RUST_LOG` is set, lines are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then `info`.

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("term_profiles_debug.log")
}

struct BridgeLogger {
    level: LevelFilter,
    mirror_stderr: bool,
    file: Mutex<Option<File>>,
}

impl BridgeLogger {
    fn write_line(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            // Logging must never take the process down.
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }
}

impl Log for BridgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<BridgeLogger> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Parse a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`).
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Install the logging bridge. Later calls are ignored.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = cli_level
        .or_else(|| rust_log.as_deref().and_then(parse_level))
        .unwrap_or(LevelFilter::Info);

    let logger = LOGGER.get_or_init(|| {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();
        BridgeLogger {
            level,
            mirror_stderr: rust_log.is_some(),
            file: Mutex::new(file),
        }
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
        logger.write_line(&format!(
            "\n{}\nterm-profiles session started at {} (level={})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            level,
            "=".repeat(80)
        ));
    }
}
