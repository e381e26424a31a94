//! `/bin/sh` stand-ins for the launch target.
//!
//! Each stub lives in its own temp directory together with the files it
//! writes (`ready`, `signals`), so tests can observe what the child saw.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use n8n_launcher::supervisor::LaunchCommand;
use tempfile::TempDir;

pub struct StubProgram {
    dir: TempDir,
    script: PathBuf,
}

impl StubProgram {
    fn from_body(body: &str) -> Self {
        let dir = TempDir::new().expect("creating stub temp dir");
        let script = dir.path().join("stub.sh");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("writing stub script");
        Self { dir, script }
    }

    /// Exits immediately with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self::from_body(&format!("exit {code}"))
    }

    /// Writes its working directory to `cwd`, then exits with `code`.
    pub fn recording_cwd(code: i32) -> Self {
        let stub = Self::from_body("");
        let body = format!("pwd > '{}'\nexit {code}", stub.cwd_file().display());
        fs::write(&stub.script, format!("#!/bin/sh\n{body}\n")).expect("writing stub script");
        stub
    }

    /// Dumps its environment to `env`, then exits 0.
    pub fn dumping_env() -> Self {
        let stub = Self::from_body("");
        let body = format!("env > '{}'\nexit 0", stub.env_file().display());
        fs::write(&stub.script, format!("#!/bin/sh\n{body}\n")).expect("writing stub script");
        stub
    }

    /// Kills itself with `SIGKILL`.
    pub fn killed_by_sigkill() -> Self {
        Self::from_body("kill -KILL $$\nsleep 5")
    }

    /// Records `TERM`/`INT` into `signals` and exits with `term_code` /
    /// `int_code` respectively. Touches `ready` once the traps are in place.
    pub fn trapping(term_code: i32, int_code: i32) -> Self {
        let stub = Self::from_body("");
        let signals = stub.signals_file();
        let ready = stub.ready_file();
        let body = format!(
            "trap 'echo TERM >> \"{signals}\"; exit {term_code}' TERM\n\
             trap 'echo INT >> \"{signals}\"; exit {int_code}' INT\n\
             touch \"{ready}\"\n\
             while :; do sleep 0.05; done",
            signals = signals.display(),
            ready = ready.display(),
        );
        fs::write(&stub.script, format!("#!/bin/sh\n{body}\n")).expect("writing stub script");
        stub
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn ready_file(&self) -> PathBuf {
        self.dir.path().join("ready")
    }

    pub fn signals_file(&self) -> PathBuf {
        self.dir.path().join("signals")
    }

    pub fn cwd_file(&self) -> PathBuf {
        self.dir.path().join("cwd")
    }

    pub fn env_file(&self) -> PathBuf {
        self.dir.path().join("env")
    }

    /// Value for `N8N_LAUNCH_COMMAND`.
    pub fn command_line(&self) -> String {
        format!("sh {}", self.script.display())
    }

    /// Launch command running the stub through `sh` with `env` and `cwd`.
    pub fn launch_command(&self, env: BTreeMap<String, String>, cwd: &Path) -> LaunchCommand {
        LaunchCommand {
            program: "sh".to_string(),
            args: vec![self.script.display().to_string()],
            env,
            cwd: cwd.to_path_buf(),
        }
    }

    /// Lines recorded by a trapping stub.
    pub fn received_signals(&self) -> Vec<String> {
        fs::read_to_string(self.signals_file())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Block until the stub announced readiness.
    pub fn wait_until_ready(&self) {
        wait_for_file(&self.ready_file());
    }

    /// Async variant of [`wait_until_ready`](Self::wait_until_ready).
    pub async fn ready(&self) {
        let ready = self.ready_file();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !ready.exists() {
            assert!(Instant::now() < deadline, "stub never became ready");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

/// Minimal environment for running `sh` stubs.
pub fn minimal_env() -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
        "PATH".to_string(),
        std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string()),
    );
    env
}

fn wait_for_file(path: &Path) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !path.exists() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", path.display());
        std::thread::sleep(Duration::from_millis(20));
    }
}
