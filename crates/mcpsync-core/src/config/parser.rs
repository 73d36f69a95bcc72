//! Canonical config parser with field-level error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::{CanonicalConfig, validate_config_value};
use crate::error::McpSyncError;
use crate::fs::parse_json_loose;

/// Parse a canonical config file.
pub fn parse_config_file(path: &Path) -> Result<CanonicalConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse canonical config content from a string.
///
/// Invalid JSON and schema violations both surface as
/// [`McpSyncError::Validation`].
pub fn parse_config_str(content: &str) -> Result<CanonicalConfig> {
    let value = parse_json_loose(content)
        .map_err(|e| McpSyncError::validation(vec![format!("Invalid JSON: {e}")]))?;

    validate_config_value(&value).map_err(|issues| McpSyncError::validation(issues).into())
}
