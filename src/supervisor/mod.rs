// src/supervisor/mod.rs

//! Single-child process supervisor.
//!
//! The supervisor launches exactly one child, forwards `SIGTERM`/`SIGINT` to
//! it, and turns the child's termination into its own exit status.
//!
//! - [`core`] is the pure state machine: events in, commands out.
//! - [`process`] wraps the OS child (spawn, wait, signal).
//! - [`runtime`] is the async shell reacting to child exit and OS signals.

use std::process::ExitStatus;

use nix::sys::signal::Signal;

pub mod core;
pub mod process;
pub mod runtime;

pub use self::core::{CoreStep, SupervisorCore};
pub use process::{ChildProcess, LaunchCommand, start};
pub use runtime::{Supervisor, spawn_signal_listener};

/// Exit status used when the child could not be started.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 1;

/// Offset added to the signal number when the child was killed by a signal.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Termination signals relayed from the supervisor to its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardedSignal {
    Terminate,
    Interrupt,
}

impl ForwardedSignal {
    pub fn as_nix(self) -> Signal {
        match self {
            ForwardedSignal::Terminate => Signal::SIGTERM,
            ForwardedSignal::Interrupt => Signal::SIGINT,
        }
    }

    pub fn name(self) -> &'static str {
        self.as_nix().as_str()
    }
}

/// How the child terminated. At most one field is set; neither is set only
/// when the OS reported no status at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => Self::exited(code),
            (None, Some(signal)) => Self::signaled(signal),
            // Stopped/continued statuses never reach `wait`.
            (None, None) => Self {
                code: None,
                signal: None,
            },
        }
    }

    /// Symbolic name of the terminating signal, e.g. `SIGTERM`.
    pub fn signal_name(&self) -> Option<String> {
        self.signal.map(|n| match Signal::try_from(n) {
            Ok(sig) => sig.as_str().to_string(),
            Err(_) => format!("signal {n}"),
        })
    }

    /// Status the supervisor exits with for this outcome.
    ///
    /// The child's own code is propagated unchanged; a signal death maps to
    /// `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match (self.code, self.signal) {
            (Some(code), _) => code,
            (None, Some(signal)) => SIGNAL_EXIT_BASE + signal,
            (None, None) => SPAWN_FAILURE_EXIT_CODE,
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Supervisor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Starting,
    Running { pid: u32 },
    Exited(ExitOutcome),
    FailedToStart,
}

impl SupervisorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SupervisorState::Exited(_) | SupervisorState::FailedToStart)
    }
}

/// Events fed into [`SupervisorCore::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    StartRequested,
    Spawned { pid: u32 },
    SpawnFailed { message: String },
    SignalReceived(ForwardedSignal),
    ChildExited(ExitOutcome),
}

/// What the async shell must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorCommand {
    ForwardSignal(ForwardedSignal),
    Exit(i32),
}
