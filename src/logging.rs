// src/logging.rs
// File sink for the `log` facade. Lines look like `[00:00:01.234][INFO] msg`
// (elapsed since start). Warnings and errors are echoed to stderr as well.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use ::log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

struct FileLogger {
    path: PathBuf,
    level: LevelFilter,
    start: Instant,
    lock: Mutex<()>,
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

impl FileLogger {
    fn write_line(&self, line: &str) {
        if let Ok(_guard) = self.lock.lock() {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
            {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = fmt_elapsed(self.start.elapsed().as_millis());
        let line = format!("[{elapsed}][{}] {}\n", record.level(), record.args());
        self.write_line(&line);

        if record.level() <= Level::Warn {
            eprint!("{line}");
        }
    }

    fn flush(&self) {}
}

/// Install the file logger. Later calls keep the first logger.
pub fn init(path: &Path, level: LevelFilter) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }

    let logger = LOGGER.get_or_init(|| FileLogger {
        path: path.to_path_buf(),
        level,
        start: Instant::now(),
        lock: Mutex::new(()),
    });

    if ::log::set_logger(logger).is_ok() {
        ::log::set_max_level(logger.level);
    }
}
