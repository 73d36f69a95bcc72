//! Server health probing
//!
//! A health check spawns a server's launch command and runs a minimal
//! JSON-RPC handshake over its stdio within a fixed time window.

pub mod checker;
pub mod diagnostics;
pub mod handshake;
pub mod process;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use checker::HealthChecker;
pub use diagnostics::{DEPENDENCY_TOOLS, DiagnosticResult, check_dependencies};
pub use process::{ExecOptions, ExecOutput, ProcessError, command_exists, exec_command};

/// Default per-server handshake window.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

pub const JSON_RPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-11-25";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Timeout,
    NotFound,
    Error,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Timeout => "timeout",
            HealthStatus::NotFound => "not-found",
            HealthStatus::Error => "error",
        }
    }
}

/// `serverInfo` reported in the initialize result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResult {
    pub server: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_info: Option<ServerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResult {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
