//! Terminal output for CraftPatent tools
//!
//! ## Features
//!
//! - Prefixed, colored status lines (info, success, error)
//! - Multi-line message support with consistent formatting
//! - A single-line progress indicator for long-running requests
//! - All output to stderr, so stdout stays clean for reports and JSON
//!
//! ## Usage
//!
//! Logging functions: `info()`, `success()`, `error()`
//!
//! Progress: `progress()` while work is running, `finish_progress()` once it ends

use colored::*;
use console::Term;
use std::io::Write;

const PREFIX_WIDTH: usize = 7;
const PROGRESS_BAR_WIDTH: usize = 24;

/// Severity of a log line, which decides its tag and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Success,
  Error,
}

impl Level {
  pub fn tag(&self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Success => "sccs",
      Level::Error => "error",
    }
  }

  fn color(&self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Success => Color::Green,
      Level::Error => Color::Red,
    }
  }
}

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Colored `[tag]` prefix padded to a fixed width
pub fn format_prefix(level: Level) -> String {
  let tag = level.tag();
  let pad = PREFIX_WIDTH.saturating_sub(tag.len() + 2);
  format!("[{}]{:<pad$}", tag.color(level.color()).bold(), "")
}

/// Prefix every line of `message` for the given level
pub fn format_message(level: Level, message: &str) -> Vec<String> {
  let prefix = format_prefix(level);
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

pub fn emit(level: Level, message: &str) {
  for line in format_message(level, message) {
    log(&line);
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  emit(Level::Error, message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Text progress bar such as `[######------]  50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
  let percent = percent.min(100) as usize;
  let filled = width * percent / 100;
  format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(width - filled), percent)
}

/// Show progress of a running task. Redraws in place on a terminal,
/// otherwise prints one line per update.
pub fn progress(percent: u8, step: &str) {
  let line = format!(
    "{} {} {}",
    format_prefix(Level::Info),
    progress_bar(percent, PROGRESS_BAR_WIDTH).cyan(),
    step
  );

  let term = Term::stderr();
  if term.is_term() {
    let _ = term.clear_line();
    let mut out = &term;
    let _ = write!(out, "{line}");
    let _ = out.flush();
  } else {
    log(&line);
  }
}

/// End an in-place progress line so following output starts on a fresh line
pub fn finish_progress() {
  let term = Term::stderr();
  if term.is_term() {
    let _ = term.write_line("");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_progress_bar_fills_proportionally() {
    assert_eq!(progress_bar(0, 10), "[----------]   0%");
    assert_eq!(progress_bar(50, 10), "[#####-----]  50%");
    assert_eq!(progress_bar(100, 10), "[##########] 100%");
  }

  #[test]
  fn test_progress_bar_clamps_overflow() {
    assert_eq!(progress_bar(250, 4), "[####] 100%");
  }

  #[test]
  fn test_format_message_prefixes_every_line() {
    colored::control::set_override(false);
    let lines = format_message(Level::Error, "first\nsecond");
    assert_eq!(lines, vec!["[error] first".to_string(), "[error] second".to_string()]);
  }
}
