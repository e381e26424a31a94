// tests/spawn_failure.rs

use std::path::PathBuf;

use n8n_launcher::errors::LauncherError;
use n8n_launcher::supervisor::{LaunchCommand, Supervisor, SupervisorState};
use n8n_launcher_test_utils::stub::{StubProgram, minimal_env};
use n8n_launcher_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

fn launch(program: &str, cwd: PathBuf) -> LaunchCommand {
    LaunchCommand {
        program: program.to_string(),
        args: vec!["start".to_string()],
        env: minimal_env(),
        cwd,
    }
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    init_tracing();

    let mut supervisor = Supervisor::new();
    let result = supervisor.start(&launch(
        "definitely-not-an-installed-program-n8n",
        std::env::temp_dir(),
    ));

    match result {
        Err(LauncherError::Spawn { command, source }) => {
            assert!(command.starts_with("definitely-not-an-installed-program-n8n"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        Err(e) => panic!("Expected Spawn error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got a child"),
    }

    assert_eq!(supervisor.state(), SupervisorState::FailedToStart);
    assert_eq!(supervisor.exit_code(), Some(1));
}

#[tokio::test]
async fn supervise_exits_non_zero_without_hanging_on_spawn_failure() {
    init_tracing();

    let (_tx, signals) = mpsc::channel(1);
    let launch = launch("no-such-binary-for-launcher", std::env::temp_dir());
    let code = with_timeout(Supervisor::new().supervise(&launch, signals)).await;

    assert_eq!(code, 1);
}

#[tokio::test]
async fn empty_command_is_rejected() {
    init_tracing();

    let mut supervisor = Supervisor::new();
    let err = supervisor
        .start(&launch("", std::env::temp_dir()))
        .expect_err("empty command must not spawn");

    assert!(matches!(err, LauncherError::Spawn { .. }));
    assert_eq!(supervisor.state(), SupervisorState::FailedToStart);
}

#[tokio::test]
async fn missing_working_directory_is_a_spawn_error() {
    init_tracing();

    let base = tempfile::tempdir().unwrap();
    let stub = StubProgram::exiting_with(0);
    let launch = stub.launch_command(minimal_env(), &base.path().join("does-not-exist"));

    let mut supervisor = Supervisor::new();
    let err = supervisor.start(&launch).expect_err("cwd is missing");
    assert!(matches!(err, LauncherError::Spawn { .. }));
}

#[tokio::test]
async fn second_start_is_rejected() {
    init_tracing();

    let stub = StubProgram::exiting_with(0);
    let launch = stub.launch_command(minimal_env(), stub.dir());

    let mut supervisor = Supervisor::new();
    let mut child = supervisor.start(&launch).unwrap();

    let err = supervisor.start(&launch).expect_err("only one child per supervisor");
    assert!(matches!(err, LauncherError::AlreadyStarted));

    let (_tx, mut signals) = mpsc::channel(1);
    let outcome = with_timeout(supervisor.await_exit(&mut child, &mut signals))
        .await
        .unwrap();
    assert!(outcome.success());
}
