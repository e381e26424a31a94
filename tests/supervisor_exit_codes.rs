// tests/supervisor_exit_codes.rs

use n8n_launcher::supervisor::{ExitOutcome, Supervisor, SupervisorState};
use n8n_launcher_test_utils::stub::{StubProgram, minimal_env};
use n8n_launcher_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

async fn run_stub(stub: &StubProgram) -> (ExitOutcome, Supervisor) {
    let launch = stub.launch_command(minimal_env(), stub.dir());
    let (_tx, mut signals) = mpsc::channel(1);

    let mut supervisor = Supervisor::new();
    let mut child = supervisor.start(&launch).expect("stub should spawn");
    let outcome = with_timeout(supervisor.await_exit(&mut child, &mut signals))
        .await
        .expect("waiting on stub");
    (outcome, supervisor)
}

#[tokio::test]
async fn exit_code_of_child_is_reported_unchanged() {
    init_tracing();

    for code in [0, 1, 42] {
        let stub = StubProgram::exiting_with(code);
        let (outcome, supervisor) = run_stub(&stub).await;

        assert_eq!(outcome.code, Some(code));
        assert_eq!(outcome.signal, None);
        assert_eq!(supervisor.exit_code(), Some(code));
        assert_eq!(supervisor.state(), SupervisorState::Exited(outcome));
    }
}

#[tokio::test]
async fn signal_death_is_reported_as_signal() {
    init_tracing();

    let stub = StubProgram::killed_by_sigkill();
    let (outcome, supervisor) = run_stub(&stub).await;

    assert_eq!(outcome.code, None);
    assert_eq!(outcome.signal, Some(9));
    assert_eq!(outcome.signal_name().as_deref(), Some("SIGKILL"));
    assert_eq!(supervisor.exit_code(), Some(137));
}

#[tokio::test]
async fn supervise_returns_child_exit_code() {
    init_tracing();

    let stub = StubProgram::exiting_with(7);
    let launch = stub.launch_command(minimal_env(), stub.dir());
    let (_tx, signals) = mpsc::channel(1);

    let code = with_timeout(Supervisor::new().supervise(&launch, signals)).await;
    assert_eq!(code, 7);
}

#[tokio::test]
async fn child_runs_in_requested_directory_with_exact_environment() {
    init_tracing();

    let stub = StubProgram::dumping_env();
    let workdir = tempfile::tempdir().unwrap();
    let mut env = minimal_env();
    env.insert("N8N_PORT".to_string(), "5678".to_string());

    let launch = stub.launch_command(env, workdir.path());
    let (_tx, signals) = mpsc::channel(1);
    let code = with_timeout(Supervisor::new().supervise(&launch, signals)).await;
    assert_eq!(code, 0);

    let dumped = std::fs::read_to_string(stub.env_file()).unwrap();
    assert!(dumped.lines().any(|l| l == "N8N_PORT=5678"));
    // Variables only present in the test process do not leak into the child.
    if std::env::var("HOME").is_ok() {
        assert!(!dumped.lines().any(|l| l.starts_with("HOME=")));
    }

    let cwd_stub = StubProgram::recording_cwd(0);
    let launch = cwd_stub.launch_command(minimal_env(), workdir.path());
    let (_tx, signals) = mpsc::channel(1);
    with_timeout(Supervisor::new().supervise(&launch, signals)).await;

    let recorded = std::fs::read_to_string(cwd_stub.cwd_file()).unwrap();
    assert_eq!(
        std::fs::canonicalize(recorded.trim()).unwrap(),
        std::fs::canonicalize(workdir.path()).unwrap()
    );
}
