// src/config.rs

//! Launcher configuration resolved from environment variables.
//!
//! There is no config file: the hosting platform supplies everything via the
//! environment. [`LauncherConfig::from_lookup`] takes an arbitrary lookup
//! function so resolution can be tested without touching the real process
//! environment.
//!
//! Empty values are treated the same as unset ones. A value that is not
//! valid UTF-8 is a [`LauncherError::ConfigError`], never a silent default.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::errors::{LauncherError, Result};
use crate::prepare::{DATABASE_DIR, LOGS_DIR, REPORTS_DIR};

pub const DATA_FOLDER_VAR: &str = "N8N_DATA_FOLDER";
pub const PORT_VAR: &str = "PORT";
pub const HOST_VAR: &str = "N8N_HOST";
pub const WEBHOOK_URL_VAR: &str = "WEBHOOK_URL";
pub const EXTERNAL_URL_VAR: &str = "RENDER_EXTERNAL_URL";
pub const ENCRYPTION_KEY_VAR: &str = "N8N_ENCRYPTION_KEY";
pub const POOL_SIZE_VAR: &str = "DB_SQLITE_POOL_SIZE";
pub const REPORTS_DIR_VAR: &str = "N8N_LAUNCHER_REPORTS_DIR";
pub const LAUNCH_COMMAND_VAR: &str = "N8N_LAUNCH_COMMAND";

/// Every variable the launcher reads.
pub const CONFIG_VARS: [&str; 9] = [
    DATA_FOLDER_VAR,
    PORT_VAR,
    HOST_VAR,
    WEBHOOK_URL_VAR,
    EXTERNAL_URL_VAR,
    ENCRYPTION_KEY_VAR,
    POOL_SIZE_VAR,
    REPORTS_DIR_VAR,
    LAUNCH_COMMAND_VAR,
];

pub const DEFAULT_DATA_FOLDER: &str = "/opt/render/project/src";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_EXTERNAL_URL: &str = "localhost:10000";
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_LAUNCH_COMMAND: &str = "npx n8n start";

/// Fully resolved launcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Root for `database/`, `logs/`, ...; also the child's working directory.
    pub data_folder: PathBuf,
    pub port: u16,
    pub host: String,
    pub webhook_url: String,
    /// `None` means a key will be generated at launch.
    pub encryption_key: Option<String>,
    pub pool_size: u32,
    pub create_reports_dir: bool,
    pub program: String,
    pub args: Vec<String>,
}

impl LauncherConfig {
    /// Resolve from the real process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_os_lookup(|key| std::env::var_os(key))
    }

    /// Resolve from raw OS strings, rejecting values that are not UTF-8.
    pub fn from_os_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut vars = HashMap::new();
        for key in CONFIG_VARS {
            if let Some(raw) = lookup(key) {
                let value = raw.into_string().map_err(|_| {
                    LauncherError::ConfigError(format!("{key} is not valid UTF-8"))
                })?;
                vars.insert(key, value);
            }
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Resolve using `lookup` for every variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_folder = get(DATA_FOLDER_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FOLDER));

        let port = match get(PORT_VAR) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let host = get(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let webhook_url = get(WEBHOOK_URL_VAR).unwrap_or_else(|| {
            let external =
                get(EXTERNAL_URL_VAR).unwrap_or_else(|| DEFAULT_EXTERNAL_URL.to_string());
            format!("https://{external}")
        });

        let pool_size = match get(POOL_SIZE_VAR) {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        let create_reports_dir = match get(REPORTS_DIR_VAR) {
            Some(raw) => parse_bool(REPORTS_DIR_VAR, &raw)?,
            None => true,
        };

        let command_line = match lookup(LAUNCH_COMMAND_VAR) {
            Some(raw) => raw,
            None => DEFAULT_LAUNCH_COMMAND.to_string(),
        };
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or_else(|| {
            LauncherError::ConfigError(format!("{LAUNCH_COMMAND_VAR} must not be empty"))
        })?;
        let args = words.collect();

        Ok(Self {
            data_folder,
            port,
            host,
            webhook_url,
            // Any non-empty key is used as given, whitespace included.
            encryption_key: lookup(ENCRYPTION_KEY_VAR).filter(|v| !v.is_empty()),
            pool_size,
            create_reports_dir,
            program,
            args,
        })
    }

    /// Subdirectories of the data folder that must exist before launch.
    pub fn required_dirs(&self) -> Vec<&'static str> {
        let mut dirs = vec![DATABASE_DIR, LOGS_DIR];
        if self.create_reports_dir {
            dirs.push(REPORTS_DIR);
        }
        dirs
    }

    /// Path of the SQLite database file inside the data folder.
    pub fn database_file(&self) -> PathBuf {
        self.data_folder.join(DATABASE_DIR).join("n8n.db")
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(LauncherError::ConfigError(format!(
            "invalid {PORT_VAR}: {raw:?} (expected 1-65535)"
        ))),
        Ok(port) => Ok(port),
    }
}

fn parse_pool_size(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(LauncherError::ConfigError(format!(
            "invalid {POOL_SIZE_VAR}: {raw:?} (expected a positive integer)"
        ))),
        Ok(size) => Ok(size),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(LauncherError::ConfigError(format!(
            "invalid {var}: {other} (expected \"true\" or \"false\")"
        ))),
    }
}
