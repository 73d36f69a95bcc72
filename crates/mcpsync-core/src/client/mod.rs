//! Client adapter layer
//!
//! Each supported client owns a single JSON file containing an `mcpServers`
//! object. Adapters are dispatched on [`ClientId`]; the only per-client
//! difference is where the file lives.

pub mod document;
pub mod paths;
pub mod registry;

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::{BACKUP_SUFFIX, ServerMap};
use crate::fs::{create_backup, file_exists, read_json_loose};
use crate::types::{ClientId, ClientScope};

pub use document::{decode_entry, format_entry, format_servers};
pub use paths::ClientPaths;
pub use registry::ClientRegistry;

/// Reads and writes the `mcpServers` section of one client's config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAdapter {
    id: ClientId,
    scope: ClientScope,
    path: PathBuf,
}

impl ClientAdapter {
    /// Adapter at the client's default scope.
    pub fn new(id: ClientId, paths: &ClientPaths) -> Self {
        Self::with_scope(id, id.default_scope(), paths)
    }

    pub fn with_scope(id: ClientId, scope: ClientScope, paths: &ClientPaths) -> Self {
        let scope = if id.supports_project_scope() {
            scope
        } else {
            ClientScope::Global
        };
        Self {
            id,
            scope,
            path: paths.config_path(id, scope),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn scope(&self) -> ClientScope {
        self.scope
    }

    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Whether the client's config file exists.
    pub fn detect(&self) -> bool {
        file_exists(&self.path)
    }

    /// Raw `mcpServers` entries. `None` when the file is missing or unreadable.
    pub fn read_existing_entries(&self) -> Option<Map<String, Value>> {
        let root = match read_json_loose(&self.path) {
            Ok(Some(root)) => root,
            Ok(None) => return None,
            Err(err) => {
                tracing::debug!(client = %self.id, error = %err, "unreadable client config");
                return None;
            }
        };

        match root.get(document::SERVERS_KEY) {
            Some(Value::Object(servers)) => Some(servers.clone()),
            Some(_) => None,
            None if root.is_object() => Some(Map::new()),
            None => None,
        }
    }

    /// Command-based servers currently configured in the client.
    pub fn read_existing_servers(&self) -> Option<ServerMap> {
        let entries = self.read_existing_entries()?;
        Some(
            entries
                .iter()
                .filter_map(|(name, value)| decode_entry(value).map(|s| (name.clone(), s)))
                .collect(),
        )
    }

    /// Merge `servers` into the client's file, leaving unmanaged content intact.
    pub fn write_servers(&self, servers: &ServerMap) -> anyhow::Result<()> {
        document::merge_servers_into(&self.path, &format_servers(servers))?;
        tracing::debug!(
            client = %self.id,
            path = %self.path.display(),
            servers = servers.len(),
            "wrote client config"
        );
        Ok(())
    }

    /// Copy the existing file to `<path>.mcpsync-backup`.
    pub fn backup(&self) -> anyhow::Result<Option<PathBuf>> {
        create_backup(&self.path, BACKUP_SUFFIX)
    }
}
