// src/supervisor/process.rs

//! The supervised OS process.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use nix::sys::signal::kill;
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::env::EnvMap;
use crate::errors::{LauncherError, Result};

use super::{ExitOutcome, ForwardedSignal};

/// Everything needed to launch the child.
///
/// `env` is the child's complete environment: nothing is inherited on top
/// of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: EnvMap,
    pub cwd: PathBuf,
}

impl LaunchCommand {
    /// Program and arguments joined for display.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A running child with inherited stdio.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    child: Child,
}

impl ChildProcess {
    pub fn pid(&self) -> u32 {
        self.pid.as_raw() as u32
    }

    /// Wait for the child to terminate.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` loop.
    pub async fn wait(&mut self) -> Result<ExitOutcome> {
        let status = self.child.wait().await?;
        Ok(ExitOutcome::from_status(status))
    }

    /// Deliver `signal` to the child.
    pub fn signal(&self, signal: ForwardedSignal) -> Result<()> {
        debug!(pid = self.pid(), signal = signal.name(), "sending signal to child");
        kill(self.pid, signal.as_nix()).map_err(|source| LauncherError::Signal {
            signal: signal.name(),
            pid: self.pid(),
            source,
        })
    }
}

/// Spawn `launch` with stdin/stdout/stderr inherited from this process.
///
/// Must be called from within a Tokio runtime.
pub fn start(launch: &LaunchCommand) -> Result<ChildProcess> {
    if launch.program.trim().is_empty() {
        return Err(LauncherError::Spawn {
            command: launch.display(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
        });
    }

    let mut command = Command::new(&launch.program);
    command
        .args(&launch.args)
        .env_clear()
        .envs(&launch.env)
        .current_dir(&launch.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let child = command.spawn().map_err(|source| LauncherError::Spawn {
        command: launch.display(),
        source,
    })?;

    let raw_pid = child.id().ok_or_else(|| LauncherError::Spawn {
        command: launch.display(),
        source: io::Error::other("spawned child has no pid"),
    })?;

    debug!(pid = raw_pid, command = %launch.display(), "child process spawned");

    Ok(ChildProcess {
        pid: Pid::from_raw(raw_pid as i32),
        child,
    })
}
