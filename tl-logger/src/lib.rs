// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Console logger for the traffic light detector.

use log::{LevelFilter, Log, Metadata, Record};
use std::str::FromStr;
use std::time::SystemTime;

mod console;
pub mod fmt;

const ENV_RUST_LOG: &str = "RUST_LOG";

/// Initialize the logger.
///
/// A valid level passed as `RUST_LOG` environment variable overrides `level`.
/// Enable output to `stdout` via `console`.
pub fn init(level: LevelFilter, console: bool) {
    let logger = Logger::new(console);

    // Set the maximum log level the log subsystem will forward to this logger impl.
    log::set_max_level(level_from_env().unwrap_or(level));
    // Set the logger in the global subsystem.
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        eprintln!("Logger already initialized, keeping the existing one");
    }
}

/// The detector logger.
#[derive(Debug)]
pub struct Logger {
    console: Option<console::Console>,
}

impl Logger {
    /// Create a new logger.
    pub fn new(console: bool) -> Self {
        let console = console.then(console::Console::default);
        Self { console }
    }
}

impl Log for Logger {
    /// Check if a log message with the specified metadata would be logged.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let thread = std::thread::current();
        let entry = fmt::Entry {
            timestamp: SystemTime::now(),
            level: record.level(),
            target: record.target(),
            file: record.file(),
            line: record.line(),
            thread: thread.name().unwrap_or("unnamed"),
            args: record.args(),
        };

        if let Some(console) = &self.console {
            // Nothing sensible left to do if stdout is gone
            let _ = console.write(&entry);
        }
    }

    fn flush(&self) {}
}

/// Try to parse the log level from the environment variable `RUST_LOG`.
fn level_from_env() -> Option<LevelFilter> {
    std::env::var(ENV_RUST_LOG).ok().and_then(|s| {
        LevelFilter::from_str(&s)
            .inspect_err(|_| eprintln!("Failed to parse log level from `RUST_LOG={s}`"))
            .ok()
    })
}
