// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The launcher takes no arguments: everything is configured through the
//! environment of the hosting platform. `clap` still provides `--help`
//! (which lists those variables) and `--version`.

use clap::Parser;

const ENVIRONMENT_HELP: &str = "\
Environment:
  N8N_DATA_FOLDER           data root and working directory [default: /opt/render/project/src]
  PORT                      port for n8n [default: 10000]
  N8N_HOST                  bind host [default: 0.0.0.0]
  WEBHOOK_URL               externally visible URL [default: https://$RENDER_EXTERNAL_URL]
  RENDER_EXTERNAL_URL       host used for the default webhook URL [default: localhost:10000]
  N8N_ENCRYPTION_KEY        secret key [default: generated per launch]
  DB_SQLITE_POOL_SIZE       SQLite pool size [default: 10]
  N8N_LAUNCHER_REPORTS_DIR  create generated-reports/ [default: true]
  N8N_LAUNCH_COMMAND        launch target [default: npx n8n start]
  N8N_LAUNCHER_LOG          diagnostic log level [default: warn]";

/// Command-line arguments for `n8n-launcher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "n8n-launcher",
    version,
    about = "Prepare the data folder and environment, then run n8n as a supervised child.",
    long_about = None,
    after_help = ENVIRONMENT_HELP
)]
pub struct CliArgs {}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
