//! Stderr logger for the `specl` binary.
//!
//! Records render as `LEVEL - message` with the level right-aligned to five
//! columns (` INFO - 2 declarations found`).

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_record(record));
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn format_record(record: &Record<'_>) -> String {
    format!("{:>5} - {}", record.level(), record.args())
}

/// Installs the stderr logger. Fails if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
