// src/supervisor/runtime.rs

//! Async shell around [`SupervisorCore`].
//!
//! Two event sources feed the core: the child's exit notification and the
//! termination signals received by this process. Both are multiplexed in one
//! `tokio::select!` loop, so a handler always runs to completion before the
//! next event is looked at.

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::console;
use crate::errors::{LauncherError, Result};

use super::core::{CoreStep, SupervisorCore};
use super::process::{self, ChildProcess, LaunchCommand};
use super::{
    ExitOutcome, ForwardedSignal, SPAWN_FAILURE_EXIT_CODE, SupervisorCommand, SupervisorEvent,
    SupervisorState,
};

/// Install `SIGTERM`/`SIGINT` handlers and relay them over a channel.
///
/// Handlers are installed before this returns, so calling it ahead of
/// [`Supervisor::start`] leaves no window where a signal takes the default
/// action and kills the supervisor without reaching the child.
pub fn spawn_signal_listener() -> Result<mpsc::Receiver<ForwardedSignal>> {
    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let (tx, rx) = mpsc::channel::<ForwardedSignal>(16);

    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = terminate.recv() => ForwardedSignal::Terminate,
                Some(()) = interrupt.recv() => ForwardedSignal::Interrupt,
                else => break,
            };

            debug!(signal = received.name(), "termination signal received");
            if tx.send(received).await.is_err() {
                break;
            }
        }
        debug!("signal listener finished");
    });

    Ok(rx)
}

/// Launches one child and mirrors its fate.
#[derive(Debug, Default)]
pub struct Supervisor {
    core: SupervisorCore,
    exit_code: Option<i32>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SupervisorState {
        self.core.state()
    }

    /// Exit status decided by the core, once the supervisor reached a
    /// terminal state.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Spawn the child. Only one child per supervisor.
    pub fn start(&mut self, launch: &LaunchCommand) -> Result<ChildProcess> {
        if self.core.state() != SupervisorState::Idle {
            return Err(LauncherError::AlreadyStarted);
        }

        self.core.step(SupervisorEvent::StartRequested);
        info!(
            command = %launch.display(),
            cwd = %launch.cwd.display(),
            "starting child process"
        );

        match process::start(launch) {
            Ok(child) => {
                self.core.step(SupervisorEvent::Spawned { pid: child.pid() });
                info!(pid = child.pid(), "child process running");
                Ok(child)
            }
            Err(err) => {
                error!(command = %launch.display(), error = %err, "failed to spawn child");
                let step = self.core.step(SupervisorEvent::SpawnFailed {
                    message: err.to_string(),
                });
                self.record_exit(&step);
                Err(err)
            }
        }
    }

    /// Wait for `child` to terminate, forwarding every signal that arrives
    /// on `signals` in the meantime. No timeout.
    pub async fn await_exit(
        &mut self,
        child: &mut ChildProcess,
        signals: &mut mpsc::Receiver<ForwardedSignal>,
    ) -> Result<ExitOutcome> {
        loop {
            tokio::select! {
                waited = child.wait() => {
                    let outcome = waited?;
                    info!(
                        pid = child.pid(),
                        exit_code = ?outcome.code,
                        signal = ?outcome.signal_name(),
                        "child process exited"
                    );
                    let step = self.core.step(SupervisorEvent::ChildExited(outcome));
                    self.execute(child, step);
                    return Ok(outcome);
                }

                Some(received) = signals.recv() => {
                    console::info(&format!(
                        "Received {}, shutting down gracefully...",
                        received.name()
                    ));
                    let step = self.core.step(SupervisorEvent::SignalReceived(received));
                    self.execute(child, step);
                }
            }
        }
    }

    /// Relay `signal` to the child. The supervisor's own state is unchanged.
    pub fn forward_signal(&self, child: &ChildProcess, signal: ForwardedSignal) -> Result<()> {
        child.signal(signal)
    }

    /// Start, wait, and return the status this process should exit with.
    pub async fn supervise(
        mut self,
        launch: &LaunchCommand,
        mut signals: mpsc::Receiver<ForwardedSignal>,
    ) -> i32 {
        let mut child = match self.start(launch) {
            Ok(child) => child,
            Err(err) => {
                console::error(&format!("Failed to start {}: {err}", launch.program));
                return self.exit_code.unwrap_or(SPAWN_FAILURE_EXIT_CODE);
            }
        };

        match self.await_exit(&mut child, &mut signals).await {
            Ok(outcome) => {
                report_outcome(&launch.program, &outcome);
                self.exit_code.unwrap_or_else(|| outcome.exit_code())
            }
            Err(err) => {
                error!(error = %err, "lost track of child process");
                console::error(&format!("Supervision of {} failed: {err}", launch.program));
                SPAWN_FAILURE_EXIT_CODE
            }
        }
    }

    fn execute(&mut self, child: &ChildProcess, step: CoreStep) {
        for command in &step.commands {
            if let SupervisorCommand::ForwardSignal(signal) = command {
                // The child may already be gone; its exit still arrives via wait().
                if let Err(err) = self.forward_signal(child, *signal) {
                    warn!(error = %err, "failed to forward signal");
                    console::warning(&format!("Could not forward {}: {err}", signal.name()));
                }
            }
        }
        self.record_exit(&step);
    }

    fn record_exit(&mut self, step: &CoreStep) {
        for command in &step.commands {
            if let SupervisorCommand::Exit(code) = command {
                debug!(exit_code = code, "supervisor exit status decided");
                self.exit_code = Some(*code);
            }
        }
    }
}

fn report_outcome(program: &str, outcome: &ExitOutcome) {
    match (outcome.code, outcome.signal_name()) {
        (Some(0), _) => console::info(&format!("{program} exited with code 0")),
        (Some(code), _) => console::error(&format!("{program} exited with code {code}")),
        (None, Some(name)) => console::error(&format!("{program} was terminated by {name}")),
        (None, None) => console::error(&format!("{program} exited without a status")),
    }
}
