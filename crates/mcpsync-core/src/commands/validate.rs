//! Validation report for the config file in the working directory.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use crate::config::{ConfigStore, validate_config_value};
use crate::error::McpSyncError;
use crate::fs::parse_json_loose;
use crate::variables::env_references;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the config file for JSON, schema and reference problems.
///
/// Unset `${env:NAME}` references are warnings; a variable counts as unset
/// when it is absent from `env` or empty.
pub fn validate_config(
    store: &ConfigStore,
    env: &HashMap<String, String>,
) -> anyhow::Result<ValidationReport> {
    let path = store.start_dir().join(store.filename());
    if !path.is_file() {
        return Err(McpSyncError::config_not_found(store.filename(), store.start_dir()).into());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match parse_json_loose(&content) {
        Err(_) => errors.push("Config file contains invalid JSON".to_string()),
        Ok(value) => match validate_config_value(&value) {
            Err(issues) => errors.extend(issues.into_iter().map(|i| format!("Schema: {i}"))),
            Ok(config) => {
                let is_unset = |var: &str| env.get(var).is_none_or(|v| v.is_empty());
                for (name, server) in &config.servers {
                    for value in server.env.values() {
                        for var in env_references(value) {
                            if is_unset(var) {
                                warnings.push(format!("Server \"{name}\": env var {var} is not set"));
                            }
                        }
                    }
                    for arg in &server.args {
                        for var in env_references(arg) {
                            if is_unset(var) {
                                warnings.push(format!(
                                    "Server \"{name}\": env var {var} is not set (in args)"
                                ));
                            }
                        }
                    }
                }
            }
        },
    }

    Ok(ValidationReport {
        path,
        errors,
        warnings,
    })
}
