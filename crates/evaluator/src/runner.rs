use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use crate::error::ExecutionError;

/// PATH handed to child processes; the parent's environment is not inherited.
const CHILD_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub elapsed: Duration,
}

/// Runs a script to completion under a hard time limit.
///
/// Only a clean exit is `Ok`; timeouts, spawn failures and non-zero exits
/// are all reported as [`ExecutionError`].
#[async_trait::async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(
        &self,
        script: &Path,
        workdir: &Path,
        timeout: Duration,
    ) -> Result<RunOutput, ExecutionError>;
}

/// Runs scripts with a Python interpreter in a separate process.
///
/// This is process hygiene, not a sandbox: the interpreter runs in isolated
/// mode (`-I`) with an emptied environment, no stdin, the snippet directory
/// as working directory, and is killed once the time limit passes.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    interpreter: String,
}

impl PythonRunner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

#[async_trait::async_trait]
impl CodeRunner for PythonRunner {
    async fn run(
        &self,
        script: &Path,
        workdir: &Path,
        timeout: Duration,
    ) -> Result<RunOutput, ExecutionError> {
        let mut command = tokio::process::Command::new(&self.interpreter);
        command
            .arg("-I")
            .arg(script)
            .current_dir(workdir)
            .env_clear()
            .env("PATH", CHILD_PATH)
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let child = command.spawn().map_err(ExecutionError::Spawn)?;

        // Dropping the pending wait on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => return Err(ExecutionError::Timeout(timeout)),
        };
        let elapsed = started.elapsed();

        if !output.status.success() {
            return Err(ExecutionError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            elapsed,
        })
    }
}
