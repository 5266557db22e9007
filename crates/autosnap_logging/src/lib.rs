#![deny(missing_docs)]
//! Shared logging utilities for the AutoSnap workspace.
//!
//! This crate provides the `snap_*` logging macros used across the codebase,
//! a helper that keeps listing URLs short and free of query data in log lines,
//! and a minimal test initializer for the global logger.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! snap_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! snap_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! snap_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! snap_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! snap_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Strips the query string and fragment from a URL before it is logged.
///
/// Listing links are often shared with tracking parameters attached; only
/// the scheme, host and path are useful for diagnosing a failed scrape.
pub fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    let end = trimmed.find(&['?', '#'][..]).unwrap_or(trimmed.len());
    let mut out = trimmed[..end].to_string();
    if end < trimmed.len() {
        out.push_str("?…");
    }
    out
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_plain_urls() {
        assert_eq!(
            redact_url("https://ca.iaai.com/vehicle-details/42"),
            "https://ca.iaai.com/vehicle-details/42"
        );
    }

    #[test]
    fn redact_drops_query_and_fragment() {
        assert_eq!(
            redact_url(" https://ca.iaai.com/vehicle-details/42?utm=x#photos "),
            "https://ca.iaai.com/vehicle-details/42?…"
        );
        assert_eq!(redact_url("https://a.example.com#top"), "https://a.example.com?…");
    }

    #[test]
    fn macros_expand_without_logger() {
        snap_debug!("debug {}", 1);
        snap_info!("info");
        snap_trace!("trace {value}", value = 3);
    }
}
