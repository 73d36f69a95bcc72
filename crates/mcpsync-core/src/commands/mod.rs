//! High-level commands for mcpsync operations.
//!
//! These return structured outcomes; rendering and prompting are left to the
//! frontend.

pub mod env;
pub mod import;
pub mod init;
pub mod servers;
pub mod templates;
pub mod validate;
pub mod watch;

pub use env::{EnvVarStatus, audit_env, mask_value};
pub use import::{DiscoveredServer, ImportReport, discover_servers, import_servers};
pub use init::{InitOutcome, init_config};
pub use servers::{
    AddOutcome, RemoveOutcome, ToggleOutcome, add_server, add_server_json, remove_server,
    set_server_disabled,
};
pub use templates::{TEMPLATES, Template, TemplateReport, apply_template, find_template};
pub use validate::{ValidationReport, validate_config};
pub use watch::{ConfigWatcher, WATCH_DEBOUNCE};
