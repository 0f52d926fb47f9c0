//! Side-channel reporting of cache hits, misses and load failures.
//!
//! Output format (one line per event):
//!
//! ```text
//! [14:03:22] Loaded ./src/data/pages/about.json
//! [14:03:22] Cached ./src/data/imports/genres.json
//! ```
//!
//! Reporting never influences what the loader returns.

use chrono::{Local, NaiveTime};
use colored::Colorize;
use std::io::{Write, stderr, stdout};

use super::cache::Action;

/// A single cache event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub action: Action,
    /// Project-relative path of the file
    pub key: String,
}

impl Report {
    pub fn new(action: Action, key: impl Into<String>) -> Self {
        Self {
            action,
            key: key.into(),
        }
    }
}

/// Receiver of loader events.
pub trait Reporter: Send + Sync {
    fn action(&self, report: &Report);

    fn error(&self, message: &str);
}

/// Writes events to stdout and errors to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    locale: String,
}

impl ConsoleReporter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn action(&self, report: &Report) {
        let time = format_time(Local::now().time(), &self.locale);
        let mut stdout = stdout().lock();
        writeln!(stdout, "{}", format_line(&time, report)).ok();
        stdout.flush().ok();
    }

    fn error(&self, message: &str) {
        let mut stderr = stderr().lock();
        writeln!(stderr, "{}", message.red()).ok();
    }
}

/// Render one report line.
fn format_line(time: &str, report: &Report) -> String {
    let action = match report.action {
        Action::Cached => report.action.as_str().bright_black().to_string(),
        Action::Loaded => report.action.as_str().to_string(),
    };
    format!(
        "[{}] {} {}",
        time.bright_black(),
        action,
        colorize_path(&report.key)
    )
}

/// `./dir/<stem>.json` with the file stem highlighted.
fn colorize_path(key: &str) -> String {
    let (dir, file) = match key.rsplit_once('/') {
        Some((dir, file)) => (format!("./{dir}/"), file),
        None => ("./".to_owned(), key),
    };
    let (stem, ext) = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (file, String::new()),
    };
    format!("{dir}{}{ext}", stem.cyan())
}

/// Medium-length time for `locale`.
///
/// US-region locales get a 12-hour clock, everything else 24-hour.
pub fn format_time(time: NaiveTime, locale: &str) -> String {
    if uses_12_hour_clock(locale) {
        time.format("%-I:%M:%S %p").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

fn uses_12_hour_clock(locale: &str) -> bool {
    locale
        .split(['-', '_'])
        .nth(1)
        .is_some_and(|region| region.eq_ignore_ascii_case("us"))
}

/// Collects events for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: parking_lot::Mutex<Vec<Report>>,
    errors: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn count(&self, action: Action) -> usize {
        self.reports.lock().iter().filter(|r| r.action == action).count()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn action(&self, report: &Report) {
        self.reports.lock().push(report.clone());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_owned());
    }
}
