// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

use console::{style, Color};
use log::Level;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

static TARGET_SIZE: AtomicUsize = AtomicUsize::new(16);

/// A log line to format
#[derive(Debug)]
pub struct Entry<'a> {
    pub timestamp: SystemTime,
    pub level: Level,
    pub target: &'a str,
    pub file: Option<&'a str>,
    pub line: Option<u32>,
    pub thread: &'a str,
    pub args: &'a std::fmt::Arguments<'a>,
}

pub fn format<W: std::io::Write>(entry: &Entry, mut writer: W) -> Result<(), std::io::Error> {
    let timestamp = OffsetDateTime::from(entry.timestamp)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| "??:??:??.???".to_owned());

    let level = {
        let level_color = match entry.level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Color256(243),
            Level::Trace => Color::White,
        };
        style(entry.level).bold().fg(level_color)
    };

    let target = {
        let target = entry.target;
        TARGET_SIZE.fetch_max(target.len(), Ordering::Relaxed);
        let target_size = TARGET_SIZE.load(Ordering::Relaxed);
        style(format!("{target:<s$}", s = target_size)).fg(target.color())
    };

    let thread = style(entry.thread).fg(entry.thread.color());
    let message = entry.args;

    // Log location on trace level - otherwise just the message.
    if entry.level == Level::Trace {
        let file = entry.file.unwrap_or("file unknown");
        let line = entry.line.unwrap_or(0);
        writeln!(
            writer,
            "{timestamp} {target} ({thread}): {level:<5}: {file}:{line}: {message}",
        )
    } else {
        writeln!(writer, "{timestamp} {target} ({thread}): {level:<5}: {message}")
    }
}

/// Generate a color of `self`.
trait HashColor {
    fn color(&self) -> Color;
}

impl HashColor for &str {
    fn color(&self) -> Color {
        let hash = self.bytes().fold(42u8, |c, x| c ^ x);
        // Skip the darkest colors, they are hard to read on dark terminals
        let color = match hash {
            c @ 0..=1 => c + 2,
            c @ 16..=21 => c + 6,
            c @ 232..=240 => c + 9,
            c => c,
        };
        Color::Color256(color)
    }
}
