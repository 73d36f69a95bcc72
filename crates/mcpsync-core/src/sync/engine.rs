//! Sync engine: mirrors the canonical server set into client config files.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::manifest::ManifestStore;
use crate::client::{ClientAdapter, ClientRegistry};
use crate::config::{CanonicalConfig, ServerMap};
use crate::types::ClientId;
use crate::variables::{VariableContext, resolve_all_servers};

/// Options for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Explicit targets; falls back to the config's sync targets.
    pub clients: Option<Vec<ClientId>>,
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(mut self, clients: Vec<ClientId>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of syncing one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub client: ClientId,
    pub success: bool,
    pub path: PathBuf,
    pub servers_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Enabled servers of `config` with placeholders resolved.
pub fn resolve_enabled(config: &CanonicalConfig, ctx: &VariableContext) -> ServerMap {
    resolve_all_servers(&config.enabled_servers(), ctx)
}

#[derive(Debug, Clone)]
pub struct SyncEngine {
    registry: ClientRegistry,
    manifest: ManifestStore,
    home_dir: PathBuf,
}

impl SyncEngine {
    pub fn new(registry: ClientRegistry, manifest: ManifestStore, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            manifest,
            home_dir: home_dir.into(),
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn manifest_store(&self) -> &ManifestStore {
        &self.manifest
    }

    /// Fresh variable context for a config stored in `config_dir`.
    pub fn variable_context(&self, config_dir: &Path) -> VariableContext {
        VariableContext::capture(config_dir, &self.home_dir)
    }

    pub fn sync(
        &self,
        config: &CanonicalConfig,
        config_dir: &Path,
        options: &SyncOptions,
    ) -> Vec<SyncResult> {
        let ctx = self.variable_context(config_dir);
        self.sync_with_context(config, &ctx, options)
    }

    /// Sync with an explicit variable context.
    ///
    /// Per-client failures are reported in the results; the loop always
    /// visits every target.
    pub fn sync_with_context(
        &self,
        config: &CanonicalConfig,
        ctx: &VariableContext,
        options: &SyncOptions,
    ) -> Vec<SyncResult> {
        let targets = options
            .clients
            .clone()
            .unwrap_or_else(|| config.sync_targets());
        let resolved = resolve_enabled(config, ctx);
        let names: Vec<String> = resolved.keys().cloned().collect();

        tracing::info!(
            clients = targets.len(),
            servers = resolved.len(),
            dry_run = options.dry_run,
            "syncing servers"
        );

        let mut results = Vec::with_capacity(targets.len());
        let mut written = Vec::new();

        for adapter in self.registry.adapters(&targets) {
            if options.dry_run {
                results.push(SyncResult {
                    client: adapter.id(),
                    success: true,
                    path: adapter.config_path().to_path_buf(),
                    servers_written: resolved.len(),
                    backup_path: None,
                    error: None,
                });
                continue;
            }

            match write_client(&adapter, &resolved) {
                Ok(backup_path) => {
                    written.push((adapter.id(), names.clone()));
                    results.push(SyncResult {
                        client: adapter.id(),
                        success: true,
                        path: adapter.config_path().to_path_buf(),
                        servers_written: resolved.len(),
                        backup_path,
                        error: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(client = %adapter.id(), error = %err, "sync failed");
                    results.push(SyncResult {
                        client: adapter.id(),
                        success: false,
                        path: adapter.config_path().to_path_buf(),
                        servers_written: 0,
                        backup_path: None,
                        error: Some(format!("{err:#}")),
                    });
                }
            }
        }

        if !options.dry_run
            && let Err(err) = self.manifest.record(&written)
        {
            tracing::warn!(error = %err, "failed to save sync manifest");
        }

        results
    }
}

fn write_client(adapter: &ClientAdapter, servers: &ServerMap) -> anyhow::Result<Option<PathBuf>> {
    let backup = adapter.backup()?;
    adapter.write_servers(servers)?;
    Ok(backup)
}
