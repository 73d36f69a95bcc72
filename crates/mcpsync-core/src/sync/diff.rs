//! Compare the resolved canonical servers against each client's file.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::client::{ClientAdapter, ClientRegistry, format_entry};
use crate::config::{ServerDefinition, ServerMap};
use crate::types::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStatus {
    /// Only in the canonical config; a sync adds it.
    Added,
    /// In both, with different content; a sync overwrites it.
    Updated,
    InSync,
    /// Only in the client; a sync leaves it alone.
    ClientOnly,
}

impl DiffStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, DiffStatus::Added | DiffStatus::Updated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDiff {
    pub server: String,
    pub status: DiffStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDiff {
    pub client: ClientId,
    pub display_name: String,
    pub path: PathBuf,
    pub exists: bool,
    pub diffs: Vec<ServerDiff>,
    pub pending_changes: usize,
}

/// Diff `resolved` against one client.
pub fn diff_client(
    adapter: &ClientAdapter,
    resolved: &ServerMap,
) -> ClientDiff {
    let existing = adapter.read_existing_entries();
    let exists = existing.is_some();

    let diffs: Vec<ServerDiff> = match existing {
        None => resolved
            .keys()
            .map(|name| ServerDiff {
                server: name.clone(),
                status: DiffStatus::Added,
            })
            .collect(),
        Some(entries) => {
            let names: BTreeSet<&String> = resolved.keys().chain(entries.keys()).collect();
            names
                .into_iter()
                .map(|name| ServerDiff {
                    server: name.clone(),
                    status: classify(resolved.get(name), entries.get(name)),
                })
                .collect()
        }
    };

    let pending_changes = diffs.iter().filter(|d| d.status.is_pending()).count();

    ClientDiff {
        client: adapter.id(),
        display_name: adapter.display_name().to_string(),
        path: adapter.config_path().to_path_buf(),
        exists,
        diffs,
        pending_changes,
    }
}

fn classify(canonical: Option<&ServerDefinition>, client: Option<&Value>) -> DiffStatus {
    match (canonical, client) {
        (Some(server), Some(entry)) if format_entry(server) == *entry => DiffStatus::InSync,
        (Some(_), Some(_)) => DiffStatus::Updated,
        (Some(_), None) => DiffStatus::Added,
        (None, _) => DiffStatus::ClientOnly,
    }
}

/// Diff `resolved` against each of `clients`, in order.
pub fn diff_clients(
    registry: &ClientRegistry,
    resolved: &ServerMap,
    clients: &[ClientId],
) -> Vec<ClientDiff> {
    registry
        .adapters(clients)
        .iter()
        .map(|adapter| diff_client(adapter, resolved))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_compares_formatted_entries() {
        let server = ServerDefinition::new("npx").with_args(["-y", "pkg"]);
        assert_eq!(
            classify(Some(&server), Some(&json!({"args": ["-y", "pkg"], "command": "npx"}))),
            DiffStatus::InSync
        );
        assert_eq!(
            classify(Some(&server), Some(&json!({"command": "npx"}))),
            DiffStatus::Updated
        );
        assert_eq!(classify(Some(&server), None), DiffStatus::Added);
        assert_eq!(classify(None, Some(&json!({}))), DiffStatus::ClientOnly);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(serde_json::to_value(DiffStatus::InSync).unwrap(), "in-sync");
        assert_eq!(serde_json::to_value(DiffStatus::ClientOnly).unwrap(), "client-only");
    }
}
