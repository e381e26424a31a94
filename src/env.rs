// src/env.rs

//! Environment table for the launched application.
//!
//! Everything here is pure except [`inherited_environment`] (reads the
//! parent's environment) and [`resolve_encryption_key`] (draws randomness).

use std::collections::BTreeMap;
use std::fmt;

use rand::RngCore;

use crate::config::LauncherConfig;
use crate::prepare::LOGS_DIR;

/// Number of random bytes in a generated encryption key.
pub const GENERATED_KEY_BYTES: usize = 32;

pub type EnvMap = BTreeMap<String, String>;

/// `base` with every entry of `overrides` added or replacing the existing value.
pub fn build_environment(base: &EnvMap, overrides: &EnvMap) -> EnvMap {
    let mut env = base.clone();
    env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

/// The parent's environment. Entries that are not valid UTF-8 are skipped.
pub fn inherited_environment() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Encryption key handed to the application.
#[derive(Clone, PartialEq, Eq)]
pub enum EncryptionKey {
    /// Supplied by the hosting platform.
    Provided(String),
    /// Freshly generated for this launch.
    Generated(String),
}

impl EncryptionKey {
    pub fn as_str(&self) -> &str {
        match self {
            EncryptionKey::Provided(k) | EncryptionKey::Generated(k) => k,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, EncryptionKey::Generated(_))
    }
}

// Never print the secret itself.
impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionKey::Provided(_) => f.write_str("EncryptionKey::Provided(..)"),
            EncryptionKey::Generated(_) => f.write_str("EncryptionKey::Generated(..)"),
        }
    }
}

/// Pass a non-empty `existing` key through, otherwise generate one.
pub fn resolve_encryption_key(existing: Option<String>) -> EncryptionKey {
    match existing.filter(|k| !k.is_empty()) {
        Some(key) => EncryptionKey::Provided(key),
        None => EncryptionKey::Generated(generate_key()),
    }
}

fn generate_key() -> String {
    let mut bytes = [0u8; GENERATED_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Variables the application needs on top of the inherited environment.
pub fn n8n_overrides(config: &LauncherConfig, key: &EncryptionKey) -> EnvMap {
    let data = config.data_folder.display().to_string();
    let port = config.port.to_string();
    let log_dir = format!("{}/", config.data_folder.join(LOGS_DIR).display());
    let custom_dir = config.data_folder.join("custom").display().to_string();

    let entries = [
        ("N8N_USER_FOLDER", data.clone()),
        ("N8N_DATA_FOLDER", data),
        ("N8N_ENCRYPTION_KEY", key.as_str().to_string()),
        ("N8N_HOST", config.host.clone()),
        ("N8N_PORT", port.clone()),
        ("PORT", port),
        ("WEBHOOK_URL", config.webhook_url.clone()),
        ("N8N_DATABASE_TYPE", "sqlite".to_string()),
        (
            "N8N_DATABASE_SQLITE_DATABASE",
            config.database_file().display().to_string(),
        ),
        ("DB_SQLITE_POOL_SIZE", config.pool_size.to_string()),
        ("N8N_RUNNERS_ENABLED", "true".to_string()),
        ("N8N_BLOCK_ENV_ACCESS_IN_NODE", "false".to_string()),
        ("N8N_GIT_NODE_DISABLE_BARE_REPOS", "true".to_string()),
        ("N8N_ENFORCE_SETTINGS_FILE_PERMISSIONS", "true".to_string()),
        ("N8N_LOG_LEVEL", "info".to_string()),
        ("N8N_LOG_OUTPUT", "console,file".to_string()),
        ("N8N_LOG_FILE_LOCATION", log_dir),
        ("N8N_CUSTOM_EXTENSIONS", custom_dir),
        ("N8N_TEMPLATES_ENABLED", "true".to_string()),
        ("N8N_TEMPLATES_HOST", "https://api.n8n.io".to_string()),
        ("N8N_VERSION_NOTIFICATIONS_ENABLED", "true".to_string()),
        (
            "N8N_VERSION_NOTIFICATIONS_ENDPOINT",
            "https://api.n8n.io/versions/".to_string(),
        ),
        ("N8N_PERSONALIZATION_ENABLED", "true".to_string()),
        ("N8N_DISABLE_UI", "false".to_string()),
        ("N8N_USER_MANAGEMENT_DISABLED", "false".to_string()),
    ];

    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
