//! Terminal logging with colored module tags.
//!
//! ```ignore
//! log!("build"; "{} pages", count);   // [build] 12 pages
//! log!("error"; "{}", err);           // to stderr
//! ```
//!
//! Per-file `Loaded`/`Cached` lines belong to the loader's reporter.

use colored::{ColoredString, Colorize};
use std::{
    io::{Write, stderr, stdout},
    sync::OnceLock,
};

/// Columns assumed when the terminal size is unknown (pipes, CI).
const FALLBACK_WIDTH: usize = 120;

static WIDTH: OnceLock<usize> = OnceLock::new();

fn terminal_width() -> usize {
    *WIDTH.get_or_init(|| {
        crossterm::terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .unwrap_or(FALLBACK_WIDTH)
    })
}

/// Log a message tagged with `module`.
///
/// ```ignore
/// log!("config"; "loaded {}", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Write `[module] message`. The `error` module goes to stderr, the rest to
/// stdout. Single-line messages are clipped to the terminal width.
pub fn log(module: &str, message: &str) {
    let line = render(module, message, terminal_width());
    if module.eq_ignore_ascii_case("error") {
        writeln!(stderr().lock(), "{line}").ok();
    } else {
        let mut out = stdout().lock();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    }
}

fn render(module: &str, message: &str, width: usize) -> String {
    let tag = tag(module);
    if message.contains('\n') {
        return format!("{tag} {message}");
    }
    // "[" + module + "] "
    let room = width.saturating_sub(module.len() + 3);
    format!("{tag} {}", clip(message, room))
}

fn tag(module: &str) -> ColoredString {
    let text = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "load" => text.bright_blue().bold(),
        "build" => text.bright_green().bold(),
        "error" => text.bright_red().bold(),
        _ => text.bright_yellow().bold(),
    }
}

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    &s[..end]
}
