// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod env;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod prepare;
pub mod supervisor;

use tracing::{debug, info};

use crate::config::LauncherConfig;
use crate::env::{build_environment, inherited_environment, n8n_overrides, resolve_encryption_key};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::prepare::prepare_directories;
use crate::supervisor::{LaunchCommand, Supervisor, spawn_signal_listener};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution from the environment
/// - directory bootstrap under the data folder
/// - the child's environment table
/// - signal handling + supervision of the child
///
/// Returns the status the process should exit with.
pub async fn run() -> Result<i32> {
    let config = LauncherConfig::from_env()?;
    launch(&config, &RealFileSystem).await
}

/// Launch with an already resolved configuration.
pub async fn launch(config: &LauncherConfig, fs: &dyn FileSystem) -> Result<i32> {
    console::banner("Starting n8n...");

    let created = prepare_directories(fs, &config.data_folder, &config.required_dirs())?;
    for path in &created {
        console::info(&format!("Created directory: {}", path.display()));
    }

    let key = resolve_encryption_key(config.encryption_key.clone());
    if key.is_generated() {
        console::info("Generated new encryption key");
    }

    let overrides = n8n_overrides(config, &key);
    let env = build_environment(&inherited_environment(), &overrides);
    debug!(variables = env.len(), "child environment built");

    console::status("Environment configured");
    console::info(&format!("Data folder: {}", config.data_folder.display()));
    console::info(&format!("Database: {}", config.database_file().display()));
    console::info(&format!("Webhook URL: {}", config.webhook_url));

    let launch = LaunchCommand {
        program: config.program.clone(),
        args: config.args.clone(),
        env,
        cwd: config.data_folder.clone(),
    };

    // Handlers go in before the child exists.
    let signals = spawn_signal_listener()?;

    console::info(&format!("Starting {}...", launch.display()));
    let code = Supervisor::new().supervise(&launch, signals).await;
    info!(exit_code = code, "launcher finished");

    Ok(code)
}
