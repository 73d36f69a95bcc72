//! Config store for discovering, loading and saving the canonical config.

use std::path::{Path, PathBuf};

use super::paths::{SCHEMA_URL, find_config_upwards, global_config_path};
use super::{CanonicalConfig, parser};
use crate::error::McpSyncError;
use crate::fs::write_json_pretty;

/// A loaded project config together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CanonicalConfig,
    pub path: PathBuf,
}

impl LoadedConfig {
    /// Directory containing the config file; `${workspaceFolder}` resolves to it.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    filename: String,
    start_dir: PathBuf,
    global_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(
        filename: impl Into<String>,
        start_dir: impl Into<PathBuf>,
        global_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            start_dir: start_dir.into(),
            global_dir: global_dir.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }

    pub fn global_config_path(&self) -> PathBuf {
        global_config_path(&self.global_dir)
    }

    /// Nearest config file at or above the start directory.
    pub fn find_config_path(&self) -> Option<PathBuf> {
        find_config_upwards(&self.start_dir, &self.filename)
    }

    /// Directory of the discovered config, or the start directory when none exists.
    pub fn config_dir(&self) -> PathBuf {
        self.find_config_path()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.start_dir.clone())
    }

    /// Path a save would write to.
    pub fn save_path(&self) -> PathBuf {
        self.find_config_path()
            .unwrap_or_else(|| self.start_dir.join(&self.filename))
    }

    /// Load the nearest project config. `Ok(None)` when no file is discoverable.
    pub fn load_project(&self) -> anyhow::Result<Option<LoadedConfig>> {
        let Some(path) = self.find_config_path() else {
            return Ok(None);
        };
        let config = parser::parse_config_file(&path)?;
        tracing::debug!(path = %path.display(), servers = config.servers.len(), "loaded project config");
        Ok(Some(LoadedConfig { config, path }))
    }

    /// Load the project config or fail with [`McpSyncError::ConfigNotFound`].
    pub fn require_project(&self) -> anyhow::Result<LoadedConfig> {
        self.load_project()?.ok_or_else(|| {
            McpSyncError::config_not_found(self.filename.clone(), self.start_dir.clone()).into()
        })
    }

    pub fn load_global(&self) -> anyhow::Result<Option<CanonicalConfig>> {
        let path = self.global_config_path();
        if !path.is_file() {
            return Ok(None);
        }
        parser::parse_config_file(&path).map(Some)
    }

    /// Global config overlaid by the project config.
    pub fn load_merged(&self) -> anyhow::Result<CanonicalConfig> {
        let project = self.load_project()?.map(|loaded| loaded.config);
        let global = self.load_global()?;

        Ok(match (project, global) {
            (Some(project), Some(global)) => project.merged_over(&global),
            (Some(project), None) => project,
            (None, Some(global)) => global,
            (None, None) => CanonicalConfig {
                schema: None,
                ..CanonicalConfig::empty()
            },
        })
    }

    /// Persist `config` to the discovered config file, or into the start directory.
    pub fn save_project(&self, config: &CanonicalConfig) -> anyhow::Result<PathBuf> {
        let path = self.save_path();
        self.save_to(&path, config)?;
        Ok(path)
    }

    /// Persist `config` into the start directory regardless of ancestors.
    pub fn save_in_start_dir(&self, config: &CanonicalConfig) -> anyhow::Result<PathBuf> {
        let path = self.start_dir.join(&self.filename);
        self.save_to(&path, config)?;
        Ok(path)
    }

    fn save_to(&self, path: &Path, config: &CanonicalConfig) -> anyhow::Result<()> {
        let mut config = config.clone();
        config.schema = Some(SCHEMA_URL.to_string());
        write_json_pretty(path, &config)?;
        tracing::debug!(path = %path.display(), "saved project config");
        Ok(())
    }
}
