//! Spawn-and-handshake health checks.

use std::process::Stdio;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::time::Instant;

use super::handshake::{
    HandshakeEvent, HandshakeOutcome, HandshakeState, LineBuffer, encode_line, initialize_request,
    transition,
};
use super::process::command_exists;
use super::{HEALTH_CHECK_TIMEOUT, HealthResult, HealthStatus};
use crate::config::{ServerDefinition, ServerMap};

/// Upper bound on waiting for a killed child to be reaped.
const REAP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct HealthChecker {
    timeout: Duration,
    client_name: String,
    client_version: String,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            timeout: HEALTH_CHECK_TIMEOUT,
            client_name: "mcpsync-doctor".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_client_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_name = name.into();
        self.client_version = version.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check every enabled server concurrently. Results follow input order.
    pub async fn check_all_servers(&self, servers: &ServerMap) -> Vec<HealthResult> {
        let checks = servers
            .iter()
            .filter(|(_, server)| server.is_enabled())
            .map(|(name, server)| self.check_server(name, server));
        join_all(checks).await
    }

    pub async fn check_server(&self, name: &str, server: &ServerDefinition) -> HealthResult {
        if !command_exists(&server.command).await {
            return HealthResult {
                server: name.to_string(),
                status: HealthStatus::NotFound,
                latency_ms: None,
                server_info: None,
                error: Some(format!("Command \"{}\" not found in PATH", server.command)),
            };
        }

        let mut child = match Command::new(&server.command)
            .args(&server.args)
            .envs(&server.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                tracing::debug!(server = name, error = %err, "spawn failed");
                return HealthResult {
                    server: name.to_string(),
                    status: HealthStatus::Error,
                    latency_ms: None,
                    server_info: None,
                    error: Some(err.to_string()),
                };
            }
        };

        let start = Instant::now();
        let deadline = start + self.timeout;
        tracing::debug!(server = name, command = %server.command, "spawned server");

        let state = match (child.stdin.take(), child.stdout.take()) {
            (Some(mut stdin), Some(mut stdout)) => {
                let init = initialize_request(&self.client_name, &self.client_version);
                send(&mut stdin, &[init]).await;

                let mut state = HandshakeState::AwaitInitResult;
                let mut buffer = LineBuffer::new();
                let mut chunk = [0u8; 4096];

                while !state.is_terminal() {
                    let events = tokio::select! {
                        read = stdout.read(&mut chunk) => match read {
                            Ok(0) | Err(_) => vec![HandshakeEvent::StdoutClosed],
                            Ok(n) => buffer
                                .push(&chunk[..n])
                                .into_iter()
                                .map(HandshakeEvent::Message)
                                .collect(),
                        },
                        _ = tokio::time::sleep_until(deadline) => vec![HandshakeEvent::DeadlineElapsed],
                    };

                    for event in events {
                        let (next, outbound) = transition(state, event);
                        state = next;
                        send(&mut stdin, &outbound).await;
                    }
                }
                state
            }
            _ => HandshakeState::Done(HandshakeOutcome::Unhealthy(
                "Failed to attach to process stdio".to_string(),
            )),
        };

        let latency_ms = start.elapsed().as_millis() as u64;

        if let Err(err) = child.start_kill() {
            tracing::debug!(server = name, error = %err, "kill failed");
        }
        if tokio::time::timeout(REAP_TIMEOUT, child.wait()).await.is_err() {
            tracing::warn!(server = name, "child not reaped after kill");
        }

        let outcome = match state {
            HandshakeState::Done(outcome) => outcome,
            _ => HandshakeOutcome::TimedOut,
        };
        tracing::debug!(server = name, latency_ms, ?outcome, "health check finished");

        into_result(name, outcome, latency_ms, self.timeout)
    }
}

async fn send(stdin: &mut ChildStdin, messages: &[Value]) {
    for message in messages {
        let line = encode_line(message);
        if let Err(err) = stdin.write_all(line.as_bytes()).await {
            tracing::debug!(error = %err, "write to server stdin failed");
            return;
        }
    }
    if !messages.is_empty() {
        let _ = stdin.flush().await;
    }
}

fn into_result(
    name: &str,
    outcome: HandshakeOutcome,
    latency_ms: u64,
    timeout: Duration,
) -> HealthResult {
    let (status, server_info, error) = match outcome {
        HandshakeOutcome::Healthy { server_info } => (HealthStatus::Healthy, server_info, None),
        HandshakeOutcome::Unhealthy(message) => (HealthStatus::Unhealthy, None, Some(message)),
        HandshakeOutcome::TimedOut => (
            HealthStatus::Timeout,
            None,
            Some(format!("Timed out after {}ms", timeout.as_millis())),
        ),
    };

    HealthResult {
        server: name.to_string(),
        status,
        latency_ms: Some(latency_ms),
        server_info,
        error,
    }
}
