// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to prepare directory {path:?}: {source}")]
    DirectoryPreparation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send {signal} to process {pid}: {source}")]
    Signal {
        signal: &'static str,
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("supervisor already started a child process")]
    AlreadyStarted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LauncherError>;
