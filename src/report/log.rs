//! Append-only run log.
//!
//! Entries are buffered in memory for the whole run and written to the log
//! file in one go when the run ends.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout used in log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// Render as `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`.
    pub fn format_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level,
            self.message
        )
    }
}

/// Buffered log of everything that happened during a run.
#[derive(Debug, Default)]
pub struct RunLog {
    destination: Option<PathBuf>,
    entries: Vec<LogEntry>,
    flushed: usize,
}

impl RunLog {
    /// Create a log that is written to `destination` on flush, if set.
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self {
            destination,
            entries: Vec::new(),
            flushed: 0,
        }
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Append an entry stamped with the current local time.
    pub fn record(&mut self, level: LogLevel, message: &str) {
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.to_string(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Append unwritten entries to the destination file.
    ///
    /// A log without a destination flushes to nowhere and always succeeds.
    /// Repeated flushes only write entries added since the last one.
    pub fn flush(&mut self) -> std::io::Result<()> {
        let Some(path) = &self.destination else {
            return Ok(());
        };
        if self.flushed == self.entries.len() {
            return Ok(());
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut buf = String::new();
        for entry in &self.entries[self.flushed..] {
            buf.push_str(&entry.format_line());
            buf.push('\n');
        }
        file.write_all(buf.as_bytes())?;

        self.flushed = self.entries.len();
        Ok(())
    }
}
