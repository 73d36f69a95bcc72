//! Bounded child-process helpers.

use std::collections::BTreeMap;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// How long `command --version` may run before the probe gives up waiting.
const EXISTENCE_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub timeout: Option<Duration>,
    /// Added on top of the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl ExecOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// `1` when the process was terminated by a signal.
    pub exit_code: i32,
}

/// Whether `command` can be spawned at all.
///
/// Runs `command --version` with null stdio. A spawn failure means the
/// command is absent; a probe that outlives its bound is killed and counted
/// as present.
pub async fn command_exists(command: &str) -> bool {
    let mut child = match Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(command, error = %err, "command not spawnable");
            return false;
        }
    };

    if tokio::time::timeout(EXISTENCE_PROBE_TIMEOUT, child.wait())
        .await
        .is_err()
    {
        let _ = child.start_kill();
        let _ = child.wait().await;
    }
    true
}

/// Run `command` to completion and collect its output.
pub async fn exec_command(
    command: &str,
    args: &[String],
    options: &ExecOptions,
) -> Result<ExecOutput, ProcessError> {
    let child = Command::new(command)
        .args(args)
        .envs(&options.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let output = match options.timeout {
        Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ProcessError::Timeout {
                command: command.to_string(),
                timeout,
            })?,
        None => child.wait_with_output().await,
    }
    .map_err(|source| ProcessError::Io {
        command: command.to_string(),
        source,
    })?;

    Ok(ExecOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_command_does_not_exist() {
        assert!(!command_exists("mcpsync-definitely-missing-binary").await);
    }

    #[tokio::test]
    async fn spawn_failure_is_typed() {
        let err = exec_command("mcpsync-definitely-missing-binary", &[], &ExecOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn collects_output_and_exit_code() {
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let output = exec_command("sh", &args, &ExecOptions::default()).await.unwrap();
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.exit_code, 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn extra_env_is_visible() {
        let args = vec!["-c".to_string(), "printf %s \"$MCPSYNC_EXTRA\"".to_string()];
        let options = ExecOptions::default().with_env("MCPSYNC_EXTRA", "yes");
        let output = exec_command("sh", &args, &options).await.unwrap();
        assert_eq!(output.stdout, "yes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_is_typed() {
        let args = vec!["-c".to_string(), "sleep 5".to_string()];
        let options = ExecOptions::default().with_timeout(Duration::from_millis(100));
        let err = exec_command("sh", &args, &options).await.unwrap_err();
        assert!(matches!(err, ProcessError::Timeout { .. }));
    }
}
