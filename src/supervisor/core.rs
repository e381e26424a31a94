// src/supervisor/core.rs

//! Pure supervisor state machine.
//!
//! `SupervisorCore` consumes [`SupervisorEvent`]s and answers with a
//! [`CoreStep`]: the commands the async shell should execute and whether the
//! shell should keep waiting. It owns no processes, channels or Tokio types,
//! so every transition can be unit tested directly.

use tracing::{debug, warn};

use super::{SPAWN_FAILURE_EXIT_CODE, SupervisorCommand, SupervisorEvent, SupervisorState};

/// Result of feeding one event into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<SupervisorCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn continue_with(commands: Vec<SupervisorCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn exit(code: i32) -> Self {
        Self {
            commands: vec![SupervisorCommand::Exit(code)],
            keep_running: false,
        }
    }

    fn idle(keep_running: bool) -> Self {
        Self {
            commands: Vec::new(),
            keep_running,
        }
    }
}

#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
    forwarded: usize,
}

impl Default for SupervisorCore {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorCore {
    pub fn new() -> Self {
        Self {
            state: SupervisorState::Idle,
            forwarded: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Number of signals relayed to the child so far.
    pub fn forwarded_signals(&self) -> usize {
        self.forwarded
    }

    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        let from = self.state;

        let step = match (from, event) {
            (SupervisorState::Idle, SupervisorEvent::StartRequested) => {
                self.state = SupervisorState::Starting;
                CoreStep::idle(true)
            }

            (SupervisorState::Starting, SupervisorEvent::Spawned { pid }) => {
                self.state = SupervisorState::Running { pid };
                CoreStep::idle(true)
            }

            (
                SupervisorState::Idle | SupervisorState::Starting,
                SupervisorEvent::SpawnFailed { message },
            ) => {
                debug!(%message, "spawn failed");
                self.state = SupervisorState::FailedToStart;
                CoreStep::exit(SPAWN_FAILURE_EXIT_CODE)
            }

            (SupervisorState::Running { .. }, SupervisorEvent::SignalReceived(signal)) => {
                self.forwarded += 1;
                CoreStep::continue_with(vec![SupervisorCommand::ForwardSignal(signal)])
            }

            (SupervisorState::Running { .. }, SupervisorEvent::ChildExited(outcome)) => {
                self.state = SupervisorState::Exited(outcome);
                CoreStep::exit(outcome.exit_code())
            }

            (state, event) => {
                warn!(?state, ?event, "event ignored in current supervisor state");
                CoreStep::idle(!state.is_terminal())
            }
        };

        if self.state != from {
            debug!(?from, to = ?self.state, "supervisor state transition");
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::{ExitOutcome, ForwardedSignal};

    fn running(pid: u32) -> SupervisorCore {
        let mut core = SupervisorCore::new();
        core.step(SupervisorEvent::StartRequested);
        core.step(SupervisorEvent::Spawned { pid });
        core
    }

    #[test]
    fn start_then_spawn_reaches_running() {
        let core = running(42);
        assert_eq!(core.state(), SupervisorState::Running { pid: 42 });
    }

    #[test]
    fn spawn_failure_exits_with_one() {
        let mut core = SupervisorCore::new();
        core.step(SupervisorEvent::StartRequested);
        let step = core.step(SupervisorEvent::SpawnFailed {
            message: "No such file or directory".into(),
        });

        assert_eq!(core.state(), SupervisorState::FailedToStart);
        assert_eq!(step.commands, vec![SupervisorCommand::Exit(1)]);
        assert!(!step.keep_running);
    }

    #[test]
    fn signal_while_running_is_forwarded_without_state_change() {
        let mut core = running(7);
        let step = core.step(SupervisorEvent::SignalReceived(ForwardedSignal::Terminate));

        assert_eq!(
            step.commands,
            vec![SupervisorCommand::ForwardSignal(ForwardedSignal::Terminate)]
        );
        assert!(step.keep_running);
        assert_eq!(core.state(), SupervisorState::Running { pid: 7 });
        assert_eq!(core.forwarded_signals(), 1);
    }

    #[test]
    fn child_exit_propagates_code() {
        let mut core = running(7);
        let step = core.step(SupervisorEvent::ChildExited(ExitOutcome::exited(42)));

        assert_eq!(step.commands, vec![SupervisorCommand::Exit(42)]);
        assert!(!step.keep_running);
        assert!(core.state().is_terminal());
    }

    #[test]
    fn signal_death_maps_to_shell_convention() {
        let mut core = running(7);
        let step = core.step(SupervisorEvent::ChildExited(ExitOutcome::signaled(15)));
        assert_eq!(step.commands, vec![SupervisorCommand::Exit(143)]);
    }

    #[test]
    fn events_after_exit_are_ignored() {
        let mut core = running(7);
        core.step(SupervisorEvent::ChildExited(ExitOutcome::exited(0)));

        let step = core.step(SupervisorEvent::SignalReceived(ForwardedSignal::Interrupt));
        assert!(step.commands.is_empty());
        assert!(!step.keep_running);

        let step = core.step(SupervisorEvent::ChildExited(ExitOutcome::exited(3)));
        assert!(step.commands.is_empty());
        assert_eq!(core.state(), SupervisorState::Exited(ExitOutcome::exited(0)));
    }

    #[test]
    fn signal_before_spawn_is_not_forwarded() {
        let mut core = SupervisorCore::new();
        core.step(SupervisorEvent::StartRequested);
        let step = core.step(SupervisorEvent::SignalReceived(ForwardedSignal::Terminate));

        assert!(step.commands.is_empty());
        assert!(step.keep_running);
        assert_eq!(core.state(), SupervisorState::Starting);
    }
}
