//! Configuration schema for the canonical `.mcpsync.json`.
//!
//! ```json
//! {
//!   "$schema": "...",
//!   "mcpServers": { "fs": { "command": "npx", "args": ["-y", "pkg"], "env": { "K": "v" } } },
//!   "sync": { "clients": ["claude-desktop", "cursor", "claude-code"] }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ClientId;

use super::paths::SCHEMA_URL;

/// Servers keyed by name, in file order.
pub type ServerMap = IndexMap<String, ServerDefinition>;

/// Environment variables in file order.
pub type EnvMap = IndexMap<String, String>;

/// Launch definition of a single stdio server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDefinition {
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: EnvMap,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl ServerDefinition {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: EnvMap::new(),
            disabled: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The `sync` section of the canonical config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_clients")]
    pub clients: Vec<ClientId>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            clients: default_clients(),
        }
    }
}

fn default_clients() -> Vec<ClientId> {
    ClientId::ALL.to_vec()
}

/// Root of the canonical config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "mcpServers", default)]
    pub servers: ServerMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncSettings>,
}

impl CanonicalConfig {
    /// A fresh config as written by `init`.
    pub fn empty() -> Self {
        Self {
            schema: Some(SCHEMA_URL.to_string()),
            servers: ServerMap::new(),
            sync: Some(SyncSettings::default()),
        }
    }

    pub fn with_sync_clients(mut self, clients: Vec<ClientId>) -> Self {
        self.sync = Some(SyncSettings { clients });
        self
    }

    /// Clients targeted by a sync when none are requested explicitly.
    pub fn sync_targets(&self) -> Vec<ClientId> {
        self.sync
            .as_ref()
            .map(|s| s.clients.clone())
            .unwrap_or_else(default_clients)
    }

    pub fn has_server(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn server(&self, name: &str) -> Option<&ServerDefinition> {
        self.servers.get(name)
    }

    /// Copy of this config with `name` appended, or replaced in place.
    pub fn with_server(&self, name: impl Into<String>, server: ServerDefinition) -> Self {
        let mut next = self.clone();
        next.servers.insert(name.into(), server);
        next
    }

    /// Copy of this config without `name`.
    pub fn without_server(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.servers.shift_remove(name);
        next
    }

    /// Copy of this config with the disabled flag of `name` set. `None` if absent.
    pub fn with_server_disabled(&self, name: &str, disabled: bool) -> Option<Self> {
        let server = self.servers.get(name)?.clone().with_disabled(disabled);
        Some(self.with_server(name, server))
    }

    pub fn enabled_servers(&self) -> ServerMap {
        self.servers
            .iter()
            .filter(|(_, server)| server.is_enabled())
            .map(|(name, server)| (name.clone(), server.clone()))
            .collect()
    }

    /// Overlay `self` (project) on top of `global`.
    ///
    /// Servers merge per name with project entries winning; `sync` comes from
    /// the project when present.
    pub fn merged_over(&self, global: &CanonicalConfig) -> Self {
        let mut servers = global.servers.clone();
        servers.extend(self.servers.clone());
        Self {
            schema: self.schema.clone(),
            servers,
            sync: self.sync.clone().or_else(|| global.sync.clone()),
        }
    }
}

/// Validate a parsed JSON document as a canonical config.
///
/// Returns every field-level problem as `path: message`.
pub fn validate_config_value(value: &Value) -> Result<CanonicalConfig, Vec<String>> {
    let mut issues = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(vec![issue("", "expected object")]);
    };

    if let Some(schema) = root.get("$schema")
        && !schema.is_string()
    {
        issues.push(issue("$schema", "expected string"));
    }

    match root.get("mcpServers") {
        None => {}
        Some(Value::Object(servers)) => {
            for (name, server) in servers {
                check_server(server, &format!("mcpServers.{name}"), &mut issues);
            }
        }
        Some(_) => issues.push(issue("mcpServers", "expected object")),
    }

    match root.get("sync") {
        None => {}
        Some(Value::Object(sync)) => check_sync(sync, &mut issues),
        Some(_) => issues.push(issue("sync", "expected object")),
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    serde_json::from_value(value.clone()).map_err(|e| vec![issue("", &e.to_string())])
}

/// Validate a single server entry, e.g. the payload of `add-json`.
pub fn validate_server_value(value: &Value) -> Result<ServerDefinition, Vec<String>> {
    let mut issues = Vec::new();
    check_server(value, "", &mut issues);
    if !issues.is_empty() {
        return Err(issues);
    }
    serde_json::from_value(value.clone()).map_err(|e| vec![issue("", &e.to_string())])
}

fn check_server(value: &Value, path: &str, issues: &mut Vec<String>) {
    let Some(server) = value.as_object() else {
        issues.push(issue(path, "expected object"));
        return;
    };

    match server.get("command") {
        Some(Value::String(command)) if !command.trim().is_empty() => {}
        Some(Value::String(_)) | None => {
            issues.push(issue(&join(path, "command"), "command is required"));
        }
        Some(_) => issues.push(issue(&join(path, "command"), "expected string")),
    }

    match server.get("args") {
        None => {}
        Some(Value::Array(args)) => {
            for (idx, arg) in args.iter().enumerate() {
                if !arg.is_string() {
                    issues.push(issue(&join(path, &format!("args.{idx}")), "expected string"));
                }
            }
        }
        Some(_) => issues.push(issue(&join(path, "args"), "expected array")),
    }

    match server.get("env") {
        None => {}
        Some(Value::Object(env)) => {
            for (key, val) in env {
                if !val.is_string() {
                    issues.push(issue(&join(path, &format!("env.{key}")), "expected string"));
                }
            }
        }
        Some(_) => issues.push(issue(&join(path, "env"), "expected object")),
    }

    if let Some(disabled) = server.get("disabled")
        && !disabled.is_boolean()
    {
        issues.push(issue(&join(path, "disabled"), "expected boolean"));
    }
}

fn check_sync(sync: &Map<String, Value>, issues: &mut Vec<String>) {
    match sync.get("clients") {
        None => {}
        Some(Value::Array(clients)) => {
            for (idx, client) in clients.iter().enumerate() {
                let path = format!("sync.clients.{idx}");
                match client.as_str() {
                    Some(id) if id.parse::<ClientId>().is_ok() => {}
                    Some(id) => issues.push(issue(
                        &path,
                        &format!(
                            "unknown client '{}', expected one of {}",
                            id,
                            ClientId::ALL.map(ClientId::as_str).join(", ")
                        ),
                    )),
                    None => issues.push(issue(&path, "expected string")),
                }
            }
        }
        Some(_) => issues.push(issue("sync.clients", "expected array")),
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn issue(path: &str, message: &str) -> String {
    if path.is_empty() {
        format!("(root): {message}")
    } else {
        format!("{path}: {message}")
    }
}
