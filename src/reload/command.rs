//! External reload command execution.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::config::ReloadConfig;
use crate::error::GatewayError;

/// Outcome of a successful reload.
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    pub elapsed: Duration,
    pub stdout: String,
}

/// The configured command that makes the proxy re-read its configuration.
pub struct ReloadCommand {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    timeout: Duration,
    /// One child at a time.
    running: Mutex<()>,
}

impl ReloadCommand {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: working_dir.into(),
            timeout,
            running: Mutex::new(()),
        }
    }

    pub fn from_config(config: &ReloadConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            config.working_dir.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Run the command and wait for it to exit.
    ///
    /// Exit status 0 is success. The deadline starts when the call is made
    /// and also bounds the wait for a reload already in progress. A child
    /// still running at the deadline is killed and reported as
    /// [`GatewayError::ReloadTimeout`].
    pub async fn run(&self) -> Result<ReloadOutcome, GatewayError> {
        let start = Instant::now();
        let deadline = tokio::time::Instant::from_std(start) + self.timeout;

        let Ok(_running) = tokio::time::timeout_at(deadline, self.running.lock()).await else {
            tracing::error!(timeout = ?self.timeout, "Timed out waiting for a running reload");
            return Err(GatewayError::ReloadTimeout(self.timeout));
        };

        tracing::info!(
            program = %self.program,
            args = ?self.args,
            working_dir = %self.working_dir.display(),
            "Running reload command"
        );

        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::io(format!("Cannot launch reload command '{}'", self.program), e)
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| {
                GatewayError::io(format!("Cannot wait for reload command '{}'", self.program), e)
            })?,
            Err(_) => {
                tracing::error!(timeout = ?self.timeout, "Reload command timed out, killed");
                return Err(GatewayError::ReloadTimeout(self.timeout));
            }
        };

        let elapsed = start.elapsed();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            tracing::warn!(
                exit_code = ?output.status.code(),
                elapsed = ?elapsed,
                stderr = %stderr,
                "Reload command failed"
            );
            return Err(GatewayError::ReloadFailed {
                exit_code: output.status.code(),
                stderr,
            });
        }

        tracing::info!(elapsed = ?elapsed, "Reload command succeeded");
        Ok(ReloadOutcome {
            elapsed,
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sh(script: &str, timeout: Duration) -> ReloadCommand {
        ReloadCommand::new("sh", vec!["-c".into(), script.into()], ".", timeout)
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let outcome = sh("echo reloaded", Duration::from_secs(5)).run().await.unwrap();
        assert_eq!(outcome.stdout, "reloaded");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_code() {
        match sh("echo 'bad directive' >&2; exit 3", Duration::from_secs(5)).run().await {
            Err(GatewayError::ReloadFailed { exit_code, stderr }) => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "bad directive");
            }
            other => panic!("expected ReloadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_io_failure() {
        let command = ReloadCommand::new(
            "/nonexistent/reload-binary",
            Vec::new(),
            ".",
            Duration::from_secs(5),
        );
        assert!(matches!(command.run().await, Err(GatewayError::Io { .. })));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let command = ReloadCommand::new(
            "sh",
            vec!["-c".into(), "test -f marker".into()],
            dir.path(),
            Duration::from_secs(5),
        );
        assert!(command.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_deadline_kills_child() {
        let start = Instant::now();
        let result = sh("sleep 30", Duration::from_millis(200)).run().await;

        assert!(matches!(result, Err(GatewayError::ReloadTimeout(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_queued_run_shares_the_deadline() {
        let command = Arc::new(sh("sleep 0.8", Duration::from_secs(1)));
        let start = Instant::now();

        let runs: Vec<_> = (0..3)
            .map(|_| {
                let command = command.clone();
                tokio::spawn(async move { command.run().await })
            })
            .collect();

        let mut timed_out = 0;
        for run in runs {
            match run.await.unwrap() {
                Ok(_) => {}
                Err(GatewayError::ReloadTimeout(_)) => timed_out += 1,
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }

        assert!(timed_out >= 1, "at least one queued run must time out");
        assert!(start.elapsed() < Duration::from_millis(2500));
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log");
        let script = format!(
            "echo start >> {0}; sleep 0.2; echo end >> {0}",
            log.display()
        );
        let command = Arc::new(sh(&script, Duration::from_secs(5)));

        let a = tokio::spawn({
            let command = command.clone();
            async move { command.run().await.is_ok() }
        });
        let b = tokio::spawn({
            let command = command.clone();
            async move { command.run().await.is_ok() }
        });
        assert!(a.await.unwrap());
        assert!(b.await.unwrap());

        let lines = std::fs::read_to_string(&log).unwrap();
        assert_eq!(lines, "start\nend\nstart\nend\n");
    }
}
