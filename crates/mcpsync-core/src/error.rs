//! Fatal error taxonomy for commands that require a canonical config.
//!
//! Per-server and per-client failures are reported as result values
//! (`HealthResult`, `SyncResult`) and never surface through these types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpSyncError {
    #[error("No {filename} found in {} or any parent directory", .search_root.display())]
    ConfigNotFound {
        filename: String,
        search_root: PathBuf,
    },

    #[error("Invalid config:\n{}", format_issues(.0))]
    Validation(Vec<String>),
}

impl McpSyncError {
    pub fn config_not_found(filename: impl Into<String>, search_root: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            filename: filename.into(),
            search_root: search_root.into(),
        }
    }

    pub fn validation(issues: Vec<String>) -> Self {
        Self::Validation(issues)
    }

    /// Field-level messages for validation failures, empty otherwise.
    pub fn issues(&self) -> &[String] {
        match self {
            Self::Validation(issues) => issues,
            Self::ConfigNotFound { .. } => &[],
        }
    }
}

fn format_issues(issues: &[String]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
