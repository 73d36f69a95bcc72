//! System dependency checks for common server launchers.

use std::time::Duration;

use serde::Serialize;

use super::process::{ExecOptions, command_exists, exec_command};

pub const DEPENDENCY_TOOLS: [&str; 5] = ["node", "npx", "python", "uvx", "docker"];

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticResult {
    pub tool: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

pub async fn check_dependencies() -> Vec<DiagnosticResult> {
    let mut results = Vec::with_capacity(DEPENDENCY_TOOLS.len());
    for tool in DEPENDENCY_TOOLS {
        results.push(check_tool(tool).await);
    }
    results
}

pub async fn check_tool(tool: &str) -> DiagnosticResult {
    let found = command_exists(tool).await;
    let version = if found { tool_version(tool).await } else { None };
    DiagnosticResult {
        tool: tool.to_string(),
        found,
        version,
    }
}

async fn tool_version(tool: &str) -> Option<String> {
    let options = ExecOptions::default().with_timeout(VERSION_TIMEOUT);
    match exec_command(tool, &["--version".to_string()], &options).await {
        Ok(output) => first_line(&output.stdout).or_else(|| first_line(&output.stderr)),
        Err(err) => {
            tracing::debug!(tool, error = %err, "version query failed");
            None
        }
    }
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
