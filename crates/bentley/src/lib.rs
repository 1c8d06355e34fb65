//! ## Features
//!
//! - Prefixed console output (info, warn, error, success, verbose)
//! - Multi-line message support with consistent formatting
//! - Timestamped event lines for long-running loops (the chat REPL)
//! - `tracing` subscriber bootstrap with an `EnvFilter`
//! - All output to stderr so stdout stays clean for replies and JSON
//!
//! ## Usage
//!
//! Call `init_tracing(verbose)` once at startup, then use the macros:
//! `bentley::info!("loaded {} records", n)`.

use chrono::Local;
use colored::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "cindy=info,warn";

/// Filter used with `--verbose`
pub const VERBOSE_FILTER: &str = "cindy=debug,info";

/// Build the filter for the given verbosity, honouring `RUST_LOG` first
pub fn env_filter(verbose: bool) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new(VERBOSE_FILTER)
    } else {
      EnvFilter::new(DEFAULT_FILTER)
    }
  })
}

/// Install the global tracing subscriber. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing(verbose: bool) {
  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(env_filter(verbose))
    .try_init();
}

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored prefix for log messages
fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

fn log_prefixed(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

pub fn verbose(message: &str) {
  log_prefixed(Color::Cyan, "verb", message);
}

/// Info level logging - general information
pub fn info(message: &str) {
  log_prefixed(Color::Blue, "info", message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log_prefixed(Color::Yellow, "warn", message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log_prefixed(Color::Red, "error", message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  log_prefixed(Color::Green, "sccs", message);
}

/// Timestamped event line
pub fn event(message: &str) {
  let timestamp = Local::now().format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", "event".blue().bold(), timestamp.cyan());
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => {
    $crate::info(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($($arg:tt)*) => {
    $crate::warn(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => {
    $crate::error(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! verbose {
  ($($arg:tt)*) => {
    $crate::verbose(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => {
    $crate::success(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! event {
  ($($arg:tt)*) => {
    $crate::event(&format!($($arg)*)); // LCOV_EXCL_LINE
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prefix_is_padded_to_fixed_width() {
    colored::control::set_override(false);
    assert_eq!(format_prefix(Color::Blue, "info"), "[info] ");
    assert_eq!(format_prefix(Color::Red, "error"), "[error]");
    colored::control::unset_override();
  }

  #[test]
  fn test_env_filter_builds_for_both_modes() {
    let quiet = env_filter(false).to_string();
    let loud = env_filter(true).to_string();
    assert!(!quiet.is_empty());
    assert!(!loud.is_empty());
  }
}
