//! Create a fresh canonical config in the working directory.

use std::path::PathBuf;

use crate::config::{CanonicalConfig, ConfigStore};
use crate::types::ClientId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created { path: PathBuf },
    AlreadyExists { path: PathBuf },
}

/// Write an empty config targeting `clients`. An existing file in the start
/// directory is only replaced with `force`.
pub fn init_config(
    store: &ConfigStore,
    clients: Vec<ClientId>,
    force: bool,
) -> anyhow::Result<InitOutcome> {
    let path = store.start_dir().join(store.filename());
    if path.is_file() && !force {
        return Ok(InitOutcome::AlreadyExists { path });
    }

    let config = CanonicalConfig::empty().with_sync_clients(clients);
    let path = store.save_in_start_dir(&config)?;
    tracing::info!(path = %path.display(), "initialized config");
    Ok(InitOutcome::Created { path })
}
