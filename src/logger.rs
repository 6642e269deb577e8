//! `log` backend that appends to a file. The terminal belongs to the
//! display, so nothing is ever logged to stdout or stderr.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
    started: Instant,
}

static INSTANCE: OnceLock<FileLogger> = OnceLock::new();

fn format_line(elapsed: Duration, level: Level, target: &str, args: fmt::Arguments) -> String {
    format!("{:>10.3} {:<5} {}: {}\n", elapsed.as_secs_f64(), level, target, args)
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed(),
            record.level(),
            record.target(),
            *record.args(),
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Send log records at `level` and above to `path`. Does nothing but set
/// the max level when logging is off.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    log::set_max_level(level);
    if level == LevelFilter::Off {
        return Ok(());
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let logger = INSTANCE.get_or_init(|| FileLogger {
        file: Mutex::new(file),
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "logger already initialised"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line(
            Duration::from_millis(1500),
            Level::Warn,
            "chip8vm::interpreter",
            format_args!("stack underflow at {:#05x}", 0x2fe),
        );
        assert_eq!(
            line,
            "     1.500 WARN  chip8vm::interpreter: stack underflow at 0x2fe\n"
        );
    }

    #[test]
    fn test_enabled_respects_level() -> io::Result<()> {
        let path = std::env::temp_dir().join(format!("chip8vm-logger-{}.log", std::process::id()));
        let logger = FileLogger {
            file: Mutex::new(File::create(&path)?),
            level: LevelFilter::Info,
            started: Instant::now(),
        };
        let info = Metadata::builder().level(Level::Info).build();
        let trace = Metadata::builder().level(Level::Trace).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&trace));
        std::fs::remove_file(&path)?;
        Ok(())
    }
}
