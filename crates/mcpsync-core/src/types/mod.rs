//! Shared core types used across configuration and client layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported external clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientId {
    /// Claude Desktop app
    ClaudeDesktop,
    /// Cursor editor
    Cursor,
    /// Claude Code CLI
    ClaudeCode,
}

impl ClientId {
    /// All clients in their canonical sync order.
    pub const ALL: [ClientId; 3] = [ClientId::ClaudeDesktop, ClientId::Cursor, ClientId::ClaudeCode];

    pub fn as_str(self) -> &'static str {
        match self {
            ClientId::ClaudeDesktop => "claude-desktop",
            ClientId::Cursor => "cursor",
            ClientId::ClaudeCode => "claude-code",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ClientId::ClaudeDesktop => "Claude Desktop",
            ClientId::Cursor => "Cursor",
            ClientId::ClaudeCode => "Claude Code",
        }
    }

    /// Scope used when no scope is requested explicitly.
    pub fn default_scope(self) -> ClientScope {
        match self {
            ClientId::ClaudeDesktop => ClientScope::Global,
            ClientId::Cursor | ClientId::ClaudeCode => ClientScope::Project,
        }
    }

    pub fn supports_project_scope(self) -> bool {
        !matches!(self, ClientId::ClaudeDesktop)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown client '{}'. Valid: {}",
                    s,
                    ClientId::ALL.map(ClientId::as_str).join(", ")
                )
            })
    }
}

/// Where a client configuration file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientScope {
    /// Per-user file under the home or app-data directory.
    Global,
    /// File inside the project directory.
    Project,
}
