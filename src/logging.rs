// src/logging.rs

//! Diagnostic logging for `n8n-launcher` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `N8N_LAUNCHER_LOG` environment variable
//! (e.g. "info", "debug") and defaults to `warn`, so the operator-facing
//! lines printed by [`crate::console`] are not duplicated.
//!
//! Logs are sent to STDERR. The child's stdio is inherited untouched.

use anyhow::Result;
use tracing_subscriber::fmt;

/// Environment variable holding the diagnostic log level.
pub const LOG_ENV_VAR: &str = "N8N_LAUNCHER_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging() -> Result<()> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(tracing::Level::WARN);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
