//! Reconciliation of the canonical config with client config files.

pub mod diff;
pub mod engine;
pub mod export;
pub mod manifest;

pub use diff::{ClientDiff, DiffStatus, ServerDiff, diff_client, diff_clients};
pub use engine::{SyncEngine, SyncOptions, SyncResult, resolve_enabled};
pub use export::export_servers;
pub use manifest::{ManifestStore, SyncManifest};
