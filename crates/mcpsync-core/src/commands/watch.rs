//! Debounced watcher on the canonical config file.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Emits one notification per burst of changes to a single file.
///
/// The parent directory is watched so that editors which save by renaming a
/// temp file over the original are still seen.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    changes: mpsc::Receiver<()>,
    path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(config_path: &Path) -> anyhow::Result<Self> {
        Self::with_debounce(config_path, WATCH_DEBOUNCE)
    }

    pub fn with_debounce(config_path: &Path, debounce: Duration) -> anyhow::Result<Self> {
        let file_name = config_path
            .file_name()
            .map(|name| name.to_os_string())
            .with_context(|| format!("Not a file path: {}", config_path.display()))?;
        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (tx, changes) = mpsc::channel();
        let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    if events
                        .iter()
                        .any(|event| event.path.file_name() == Some(file_name.as_os_str()))
                    {
                        let _ = tx.send(());
                    }
                }
                Err(err) => tracing::warn!(error = %err, "file watcher error"),
            }
        })
        .context("Failed to create file watcher")?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        tracing::debug!(path = %config_path.display(), "watching config");

        Ok(Self {
            _debouncer: debouncer,
            changes,
            path: config_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the next change. `false` once the watcher has shut down.
    pub fn wait_for_change(&self) -> bool {
        self.changes.recv().is_ok()
    }

    /// Like [`wait_for_change`](Self::wait_for_change) but gives up after `timeout`.
    pub fn wait_for_change_timeout(&self, timeout: Duration) -> bool {
        self.changes.recv_timeout(timeout).is_ok()
    }
}
