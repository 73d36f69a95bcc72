use mcpsync_core::client::{ClientAdapter, ClientPaths};
use mcpsync_core::config::{ServerDefinition, ServerMap};
use mcpsync_core::types::ClientId;
use serde_json::{Value, json};
use tempfile::TempDir;

fn paths(temp: &TempDir) -> ClientPaths {
    ClientPaths::new(
        temp.path().join("home"),
        temp.path().join("appdata"),
        temp.path().join("project"),
    )
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn write_creates_missing_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::Cursor, &paths(&temp));
    let servers = ServerMap::from([(
        "fs".to_string(),
        ServerDefinition::new("npx").with_args(["-y", "server-filesystem"]),
    )]);

    adapter.write_servers(&servers).unwrap();

    assert!(adapter.detect());
    assert_eq!(
        read_json(adapter.config_path()),
        json!({"mcpServers": {"fs": {"command": "npx", "args": ["-y", "server-filesystem"]}}})
    );
}

#[test]
fn write_preserves_unmanaged_keys_and_their_order() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::ClaudeCode, &paths(&temp));
    std::fs::create_dir_all(temp.path().join("project")).unwrap();
    std::fs::write(
        adapter.config_path(),
        r#"{
  "theme": "dark",
  "mcpServers": {
    "mine": {"command": "my-server"},
    "fs": {"command": "old"}
  },
  "zeta": 1
}"#,
    )
    .unwrap();

    let servers = ServerMap::from([("fs".to_string(), ServerDefinition::new("npx"))]);
    adapter.write_servers(&servers).unwrap();

    let written = read_json(adapter.config_path());
    let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["theme", "mcpServers", "zeta"]);
    assert_eq!(written["mcpServers"]["mine"], json!({"command": "my-server"}));
    assert_eq!(written["mcpServers"]["fs"], json!({"command": "npx"}));
}

#[test]
fn write_refuses_to_clobber_unparseable_file() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::ClaudeCode, &paths(&temp));
    std::fs::create_dir_all(temp.path().join("project")).unwrap();
    std::fs::write(adapter.config_path(), "not json at all {").unwrap();

    let servers = ServerMap::from([("fs".to_string(), ServerDefinition::new("npx"))]);
    assert!(adapter.write_servers(&servers).is_err());
    assert_eq!(
        std::fs::read_to_string(adapter.config_path()).unwrap(),
        "not json at all {"
    );
}

#[test]
fn read_existing_servers_skips_url_entries() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::Cursor, &paths(&temp));
    std::fs::create_dir_all(temp.path().join("project/.cursor")).unwrap();
    std::fs::write(
        adapter.config_path(),
        r#"{"mcpServers": {
            "remote": {"url": "https://example.com/mcp"},
            "local": {"command": "uvx", "args": ["mcp-server-git"], "env": {"A": "1"}}
        }}"#,
    )
    .unwrap();

    let servers = adapter.read_existing_servers().unwrap();

    assert_eq!(servers.len(), 1);
    let local = &servers["local"];
    assert_eq!(local.command, "uvx");
    assert_eq!(local.args, vec!["mcp-server-git"]);
    assert_eq!(local.env.get("A").map(String::as_str), Some("1"));
}

#[test]
fn missing_file_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::Cursor, &paths(&temp));

    assert!(!adapter.detect());
    assert!(adapter.read_existing_servers().is_none());
    assert!(adapter.backup().unwrap().is_none());
}

#[test]
fn backup_copies_current_content() {
    let temp = TempDir::new().unwrap();
    let adapter = ClientAdapter::new(ClientId::ClaudeCode, &paths(&temp));
    std::fs::create_dir_all(temp.path().join("project")).unwrap();
    std::fs::write(adapter.config_path(), r#"{"mcpServers": {}}"#).unwrap();

    let backup = adapter.backup().unwrap().unwrap();

    assert_eq!(backup, temp.path().join("project/.mcp.json.mcpsync-backup"));
    assert_eq!(
        std::fs::read_to_string(backup).unwrap(),
        r#"{"mcpServers": {}}"#
    );
}
