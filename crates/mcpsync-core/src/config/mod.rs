//! Canonical configuration
//!
//! The project-owned `.mcpsync.json` is discovered by walking up from the
//! working directory. A user-global `~/.mcpsync/config.json` sits beneath it
//! in the merged view.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config_file, parse_config_str};
pub use paths::{
    BACKUP_SUFFIX, CONFIG_FILENAME, SCHEMA_URL, find_config_upwards, global_config_dir,
    sync_manifest_path,
};
pub use schema::{
    CanonicalConfig, EnvMap, ServerDefinition, ServerMap, SyncSettings, validate_config_value,
    validate_server_value,
};
pub use store::{ConfigStore, LoadedConfig};
