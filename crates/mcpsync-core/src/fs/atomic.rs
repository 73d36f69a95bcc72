//! Durable file writes and backups.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Write `data` to a sibling temp file, then rename it over `path`.
///
/// Parent directories are created as needed. An existing target keeps its
/// permissions on unix.
pub fn atomic_write(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", path.display()))?
        .to_string_lossy()
        .to_string();
    let tmp = parent.join(format!("{file_name}.tmp.{}", std::process::id()));

    {
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("Failed to create temp file: {}", tmp.display()))?;
        file.write_all(data)
            .with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush temp file: {}", tmp.display()))?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            let mode = meta.permissions().mode();
            let _ = fs::set_permissions(&tmp, fs::Permissions::from_mode(mode));
        }
    }

    #[cfg(windows)]
    {
        if path.exists() {
            let _ = fs::remove_file(path);
        }
    }

    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| {
            format!("Failed to replace {} with {}", path.display(), tmp.display())
        });
    }
    Ok(())
}

/// Copy `path` to `<path><suffix>`. Returns `None` when there is nothing to back up.
pub fn create_backup(path: &Path, suffix: &str) -> anyhow::Result<Option<PathBuf>> {
    if !file_exists(path) {
        return Ok(None);
    }
    let mut backup = path.as_os_str().to_owned();
    backup.push(suffix);
    let backup = PathBuf::from(backup);
    fs::copy(path, &backup).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    tracing::debug!(path = %path.display(), backup = %backup.display(), "created backup");
    Ok(Some(backup))
}
