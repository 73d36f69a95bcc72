//! Server mutations on the canonical config.
//!
//! Each operation loads the nearest project config, applies one change and
//! saves it back. Outcomes that leave the config untouched are reported
//! without writing.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{ConfigStore, ServerDefinition, validate_server_value};
use crate::error::McpSyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { path: PathBuf },
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { path: PathBuf },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Changed { path: PathBuf },
    AlreadyInState,
    NotFound,
}

pub fn add_server(store: &ConfigStore, name: &str, server: ServerDefinition) -> Result<AddOutcome> {
    let loaded = store.require_project()?;
    if loaded.config.has_server(name) {
        return Ok(AddOutcome::AlreadyExists);
    }
    check_server(name, &server)?;

    let updated = loaded.config.with_server(name, server);
    let path = store.save_project(&updated)?;
    tracing::info!(server = name, "added server");
    Ok(AddOutcome::Added { path })
}

/// Add a server from a raw JSON object such as `{"command":"npx","args":[...]}`.
///
/// The duplicate check runs before the payload is looked at.
pub fn add_server_json(store: &ConfigStore, name: &str, json: &str) -> Result<AddOutcome> {
    let loaded = store.require_project()?;
    if loaded.config.has_server(name) {
        return Ok(AddOutcome::AlreadyExists);
    }

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| McpSyncError::validation(vec![format!("Invalid JSON: {e}")]))?;
    let server = validate_server_value(&value).map_err(McpSyncError::validation)?;

    let updated = loaded.config.with_server(name, server);
    let path = store.save_project(&updated)?;
    tracing::info!(server = name, "added server from JSON");
    Ok(AddOutcome::Added { path })
}

pub fn remove_server(store: &ConfigStore, name: &str) -> Result<RemoveOutcome> {
    let loaded = store.require_project()?;
    if !loaded.config.has_server(name) {
        return Ok(RemoveOutcome::NotFound);
    }

    let path = store.save_project(&loaded.config.without_server(name))?;
    tracing::info!(server = name, "removed server");
    Ok(RemoveOutcome::Removed { path })
}

/// Backs both `enable` (`disabled = false`) and `disable`.
pub fn set_server_disabled(store: &ConfigStore, name: &str, disabled: bool) -> Result<ToggleOutcome> {
    let loaded = store.require_project()?;
    let Some(current) = loaded.config.server(name) else {
        return Ok(ToggleOutcome::NotFound);
    };
    if current.disabled == disabled {
        return Ok(ToggleOutcome::AlreadyInState);
    }

    let Some(updated) = loaded.config.with_server_disabled(name, disabled) else {
        return Ok(ToggleOutcome::NotFound);
    };
    let path = store.save_project(&updated)?;
    tracing::info!(server = name, disabled, "toggled server");
    Ok(ToggleOutcome::Changed { path })
}

fn check_server(name: &str, server: &ServerDefinition) -> Result<()> {
    let mut issues = Vec::new();
    if name.trim().is_empty() {
        issues.push("name: server name is required".to_string());
    }
    if server.command.trim().is_empty() {
        issues.push("command: command is required".to_string());
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(McpSyncError::validation(issues).into())
    }
}
