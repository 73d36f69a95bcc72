//! Record of which servers were last written to each client.
//!
//! The manifest is informational. It is never read back to decide what a
//! sync writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::fs::{read_json_loose, write_json_pretty};
use crate::types::ClientId;

/// `{ clientId: [serverName...] }`
pub type SyncManifest = BTreeMap<ClientId, Vec<String>>;

#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the manifest; a missing file is an empty manifest.
    pub fn load(&self) -> anyhow::Result<SyncManifest> {
        let Some(value) = read_json_loose(&self.path)? else {
            return Ok(SyncManifest::new());
        };
        serde_json::from_value(value)
            .with_context(|| format!("Invalid sync manifest: {}", self.path.display()))
    }

    pub fn save(&self, manifest: &SyncManifest) -> anyhow::Result<()> {
        write_json_pretty(&self.path, manifest)
            .with_context(|| format!("Failed to save sync manifest: {}", self.path.display()))
    }

    /// Replace the entries for `written` clients, keeping the others.
    pub fn record(&self, written: &[(ClientId, Vec<String>)]) -> anyhow::Result<SyncManifest> {
        let mut manifest = self.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring unreadable sync manifest");
            SyncManifest::new()
        });
        for (client, servers) in written {
            manifest.insert(*client, servers.clone());
        }
        self.save(&manifest)?;
        Ok(manifest)
    }
}
