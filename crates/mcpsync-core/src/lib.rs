//! mcpsync Core Library
//!
//! Keeps one canonical list of MCP server launch definitions and mirrors it
//! into the config files of several clients, and probes servers with a
//! minimal JSON-RPC handshake.

pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod health;
pub mod sync;
pub mod types;
pub mod variables;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        CanonicalConfig, ConfigStore, LoadedConfig, ServerDefinition, ServerMap,
    };

    // Client
    pub use crate::client::{ClientAdapter, ClientPaths, ClientRegistry};
    pub use crate::types::{ClientId, ClientScope};

    // Sync
    pub use crate::sync::{ClientDiff, DiffStatus, SyncEngine, SyncOptions, SyncResult};

    // Health
    pub use crate::health::{HealthChecker, HealthResult, HealthStatus};

    // Context and errors
    pub use crate::context::AppContext;
    pub use crate::error::McpSyncError;
    pub use crate::variables::VariableContext;
}
