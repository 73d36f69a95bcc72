//! Managed `mcpServers` section inside an external client document.
//!
//! Only the named entries are replaced; every other top-level key and every
//! unmanaged server entry is carried through in its original order.

use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};

use crate::config::{ServerDefinition, ServerMap};
use crate::fs::{parse_json_loose, write_json_pretty};

pub const SERVERS_KEY: &str = "mcpServers";

/// Client-side representation of one server: `disabled` dropped, empty
/// `args`/`env` omitted.
pub fn format_entry(server: &ServerDefinition) -> Value {
    let mut entry = Map::new();
    entry.insert("command".to_string(), Value::String(server.command.clone()));
    if !server.args.is_empty() {
        entry.insert(
            "args".to_string(),
            Value::Array(server.args.iter().cloned().map(Value::String).collect()),
        );
    }
    if !server.env.is_empty() {
        entry.insert(
            "env".to_string(),
            Value::Object(
                server
                    .env
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        );
    }
    Value::Object(entry)
}

pub fn format_servers(servers: &ServerMap) -> Map<String, Value> {
    servers
        .iter()
        .map(|(name, server)| (name.clone(), format_entry(server)))
        .collect()
}

/// Decode a client entry. `None` for entries that are not command-based.
pub fn decode_entry(value: &Value) -> Option<ServerDefinition> {
    let entry = value.as_object()?;
    let command = entry.get("command")?.as_str()?;
    if command.is_empty() {
        return None;
    }

    let args = entry
        .get("args")
        .and_then(Value::as_array)
        .map(|args| {
            args.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let env = entry
        .get("env")
        .and_then(Value::as_object)
        .map(|env| {
            env.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default();

    Some(ServerDefinition {
        command: command.to_string(),
        args,
        env,
        disabled: false,
    })
}

/// Load the document root. Missing file is an empty object.
pub fn load_document(path: &Path) -> anyhow::Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read client config: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    let value = parse_json_loose(&content)
        .with_context(|| format!("Failed to parse client config: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Expected JSON object at root: {}", path.display()),
    }
}

/// The `mcpServers` object of `root`, empty when absent.
pub fn extract_servers(root: &Map<String, Value>) -> anyhow::Result<Map<String, Value>> {
    match root.get(SERVERS_KEY) {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => anyhow::bail!("Expected '{}' to be a JSON object", SERVERS_KEY),
    }
}

/// Replace the named entries of `mcpServers` in the document at `path`.
pub fn merge_servers_into(path: &Path, desired: &Map<String, Value>) -> anyhow::Result<()> {
    let mut root = load_document(path)?;
    let mut servers = extract_servers(&root)?;

    for (name, entry) in desired {
        servers.insert(name.clone(), entry.clone());
    }
    root.insert(SERVERS_KEY.to_string(), Value::Object(servers));

    write_json_pretty(path, &Value::Object(root))
}
