//! Import servers that are already configured in client files.

use std::path::PathBuf;

use crate::client::ClientRegistry;
use crate::config::{CanonicalConfig, ConfigStore, ServerDefinition};
use crate::types::ClientId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredServer {
    pub name: String,
    pub source: ClientId,
    pub server: ServerDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub path: PathBuf,
    pub imported: Vec<String>,
}

/// Command-based servers found in each client's file, in client order.
pub fn discover_servers(registry: &ClientRegistry, clients: &[ClientId]) -> Vec<DiscoveredServer> {
    let mut discovered = Vec::new();
    for adapter in registry.adapters(clients) {
        let Some(servers) = adapter.read_existing_servers() else {
            continue;
        };
        tracing::debug!(client = %adapter.id(), count = servers.len(), "discovered servers");
        discovered.extend(servers.into_iter().map(|(name, server)| DiscoveredServer {
            name,
            source: adapter.id(),
            server,
        }));
    }
    discovered
}

/// Copy the `selected` servers into the project config, creating it when absent.
///
/// The first discovered entry wins for a name seen in several clients; an
/// existing canonical entry with the same name is replaced.
pub fn import_servers(
    store: &ConfigStore,
    discovered: &[DiscoveredServer],
    selected: &[String],
) -> anyhow::Result<ImportReport> {
    let mut config = store
        .load_project()?
        .map(|loaded| loaded.config)
        .unwrap_or_else(CanonicalConfig::empty);

    let mut imported = Vec::new();
    for name in selected {
        if let Some(found) = discovered.iter().find(|d| &d.name == name) {
            config = config.with_server(name.clone(), found.server.clone());
            imported.push(name.clone());
        }
    }

    let path = store.save_project(&config)?;
    tracing::info!(count = imported.len(), "imported servers");
    Ok(ImportReport { path, imported })
}
