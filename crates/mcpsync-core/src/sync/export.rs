//! Render resolved servers as a client-style JSON document.


use serde_json::{Value, json};

use crate::client::format_servers;
use crate::config::ServerMap;

/// `{ "mcpServers": {...} }`, or the bare server map when `raw`.
pub fn export_servers(resolved: &ServerMap, raw: bool) -> Value {
    let formatted = Value::Object(format_servers(resolved));
    if raw {
        formatted
    } else {
        json!({ "mcpServers": formatted })
    }
}
