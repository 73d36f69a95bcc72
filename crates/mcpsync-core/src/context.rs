//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::client::{ClientPaths, ClientRegistry};
use crate::config::{CONFIG_FILENAME, ConfigStore, global_config_dir, sync_manifest_path};
use crate::sync::{ManifestStore, SyncEngine};

/// Unified application context for dependency injection.
///
/// Frontends create this once and derive every store and engine from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    cwd: PathBuf,
    global_dir: PathBuf,
    config_filename: String,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(home_dir: PathBuf, cwd: PathBuf, global_dir: PathBuf) -> Self {
        Self {
            home_dir,
            cwd,
            global_dir,
            config_filename: CONFIG_FILENAME.to_string(),
        }
    }

    /// Build a context from the process: home directory and working directory.
    pub fn from_env() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let global_dir = global_config_dir(&home_dir);
        Ok(Self::new(home_dir, cwd, global_dir))
    }

    /// Override the canonical config filename.
    pub fn with_config_filename(mut self, filename: impl Into<String>) -> Self {
        self.config_filename = filename.into();
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(
            self.config_filename.clone(),
            self.cwd.clone(),
            self.global_dir.clone(),
        )
    }

    /// Client paths whose project-scoped files live in `project_dir`.
    pub fn client_paths(&self, project_dir: &Path) -> ClientPaths {
        ClientPaths::detect(&self.home_dir, project_dir)
    }

    pub fn client_registry(&self, project_dir: &Path) -> ClientRegistry {
        ClientRegistry::new(self.client_paths(project_dir))
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::new(sync_manifest_path(&self.global_dir))
    }

    /// Sync engine writing project-scoped client files into `project_dir`.
    pub fn sync_engine(&self, project_dir: &Path) -> SyncEngine {
        SyncEngine::new(
            self.client_registry(project_dir),
            self.manifest_store(),
            self.home_dir.clone(),
        )
    }
}
