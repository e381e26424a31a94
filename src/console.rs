// src/console.rs

//! Operator-facing progress lines.
//!
//! These are the short, coloured status messages a hosting platform shows in
//! its deploy log ("Environment configured", "Failed to start n8n", ...).
//! They are separate from the `tracing` diagnostics set up in
//! [`crate::logging`]; callers pick a [`ConsoleLevel`] and a message, the
//! marker and colour come from here.

use colored::{Color, Colorize};

/// Severity / flavour of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Status,
    Warning,
    Error,
}

impl ConsoleLevel {
    /// Leading marker printed before the message.
    pub fn marker(self) -> &'static str {
        match self {
            ConsoleLevel::Info => "ℹ️ ",
            ConsoleLevel::Status => "✅",
            ConsoleLevel::Warning => "⚠️ ",
            ConsoleLevel::Error => "❌",
        }
    }

    pub fn color(self) -> Color {
        match self {
            ConsoleLevel::Info => Color::Blue,
            ConsoleLevel::Status => Color::Green,
            ConsoleLevel::Warning => Color::Yellow,
            ConsoleLevel::Error => Color::Red,
        }
    }
}

/// The line for `message` without any terminal styling.
pub fn format_plain(level: ConsoleLevel, message: &str) -> String {
    format!("{} {}", level.marker(), message)
}

/// The line for `message` coloured for its level.
///
/// Colouring honours `NO_COLOR` / `CLICOLOR` through `colored`.
pub fn format_styled(level: ConsoleLevel, message: &str) -> String {
    format_plain(level, message).color(level.color()).to_string()
}

/// Print a line. Errors go to stderr, everything else to stdout.
pub fn emit(level: ConsoleLevel, message: &str) {
    let line = format_styled(level, message);
    match level {
        ConsoleLevel::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

pub fn info(message: &str) {
    emit(ConsoleLevel::Info, message);
}

pub fn status(message: &str) {
    emit(ConsoleLevel::Status, message);
}

pub fn warning(message: &str) {
    emit(ConsoleLevel::Warning, message);
}

pub fn error(message: &str) {
    emit(ConsoleLevel::Error, message);
}

/// Start-of-run banner.
pub fn banner(message: &str) {
    println!("{}", format!("🚀 {message}").cyan().bold());
}
