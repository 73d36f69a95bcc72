//! Client registry for building and filtering client adapters.

use crate::types::{ClientId, ClientScope};

use super::{ClientAdapter, ClientPaths};

/// Registry of adapters for every supported client.
///
/// Adapters are resolved against one [`ClientPaths`] value, so a registry is
/// tied to a single project directory.
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    paths: ClientPaths,
}

impl ClientRegistry {
    pub fn new(paths: ClientPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ClientPaths {
        &self.paths
    }

    /// Adapter for `id` at its default scope.
    pub fn adapter(&self, id: ClientId) -> ClientAdapter {
        ClientAdapter::new(id, &self.paths)
    }

    pub fn adapter_with_scope(&self, id: ClientId, scope: ClientScope) -> ClientAdapter {
        ClientAdapter::with_scope(id, scope, &self.paths)
    }

    /// Adapters for the given ids, in the given order.
    pub fn adapters(&self, ids: &[ClientId]) -> Vec<ClientAdapter> {
        ids.iter().map(|id| self.adapter(*id)).collect()
    }

    /// Adapters for all clients.
    pub fn all(&self) -> Vec<ClientAdapter> {
        self.adapters(&ClientId::ALL)
    }

    /// Adapters whose config file exists.
    pub fn detect_installed(&self) -> Vec<ClientAdapter> {
        self.all().into_iter().filter(ClientAdapter::detect).collect()
    }

    /// List all client IDs.
    pub fn client_ids(&self) -> Vec<&'static str> {
        ClientId::ALL.iter().map(|id| id.as_str()).collect()
    }
}
