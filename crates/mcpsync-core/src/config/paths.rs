//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".mcpsync.json";
pub const GLOBAL_CONFIG_DIR: &str = ".mcpsync";
pub const GLOBAL_CONFIG_FILENAME: &str = "config.json";
pub const SYNC_MANIFEST_FILENAME: &str = "sync-manifest.json";
pub const BACKUP_SUFFIX: &str = ".mcpsync-backup";
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/mcpsync/mcpsync/main/schema/mcpsync.schema.json";

pub fn global_config_dir(home_dir: &Path) -> PathBuf {
    home_dir.join(GLOBAL_CONFIG_DIR)
}

pub fn global_config_path(global_dir: &Path) -> PathBuf {
    global_dir.join(GLOBAL_CONFIG_FILENAME)
}

pub fn sync_manifest_path(global_dir: &Path) -> PathBuf {
    global_dir.join(SYNC_MANIFEST_FILENAME)
}

/// Walk from `start_dir` up to the filesystem root looking for `filename`.
pub fn find_config_upwards(start_dir: &Path, filename: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_config_in_start_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "{}").unwrap();

        assert_eq!(find_config_upwards(temp.path(), CONFIG_FILENAME), Some(path));
    }

    #[test]
    fn walks_up_to_ancestor() {
        let temp = TempDir::new().unwrap();
        let child = temp.path().join("child/deep");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(temp.path().join(CONFIG_FILENAME), "{}").unwrap();

        assert_eq!(
            find_config_upwards(&child, CONFIG_FILENAME),
            Some(temp.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn directory_with_config_name_is_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("custom.json")).unwrap();
        assert!(find_config_upwards(temp.path(), "custom.json").is_none());
    }

    #[test]
    fn global_layout() {
        let dir = global_config_dir(Path::new("/home/u"));
        assert_eq!(dir, PathBuf::from("/home/u/.mcpsync"));
        assert_eq!(global_config_path(&dir), PathBuf::from("/home/u/.mcpsync/config.json"));
        assert_eq!(
            sync_manifest_path(&dir),
            PathBuf::from("/home/u/.mcpsync/sync-manifest.json")
        );
    }
}
