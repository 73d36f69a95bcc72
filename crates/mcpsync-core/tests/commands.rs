use std::collections::HashMap;

use mcpsync_core::client::{ClientPaths, ClientRegistry};
use mcpsync_core::commands::{
    AddOutcome, InitOutcome, RemoveOutcome, ToggleOutcome, add_server, add_server_json,
    apply_template, discover_servers, find_template, import_servers, init_config, remove_server,
    set_server_disabled, validate_config,
};
use mcpsync_core::config::{CONFIG_FILENAME, ConfigStore, ServerDefinition};
use mcpsync_core::error::McpSyncError;
use mcpsync_core::types::ClientId;
use tempfile::TempDir;

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("project")).unwrap();
        Self { temp }
    }

    fn project(&self) -> std::path::PathBuf {
        self.temp.path().join("project")
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::new(
            CONFIG_FILENAME,
            self.project(),
            self.temp.path().join("home/.mcpsync"),
        )
    }

    fn registry(&self) -> ClientRegistry {
        ClientRegistry::new(ClientPaths::new(
            self.temp.path().join("home"),
            self.temp.path().join("appdata"),
            self.project(),
        ))
    }

    fn init(&self) {
        init_config(&self.store(), ClientId::ALL.to_vec(), false).unwrap();
    }

    fn config_text(&self) -> String {
        std::fs::read_to_string(self.project().join(CONFIG_FILENAME)).unwrap()
    }
}

#[test]
fn init_refuses_existing_config_without_force() {
    let fixture = Fixture::new();
    let store = fixture.store();

    assert!(matches!(
        init_config(&store, vec![ClientId::Cursor], false).unwrap(),
        InitOutcome::Created { .. }
    ));
    assert!(matches!(
        init_config(&store, ClientId::ALL.to_vec(), false).unwrap(),
        InitOutcome::AlreadyExists { .. }
    ));
    assert_eq!(
        store.require_project().unwrap().config.sync_targets(),
        vec![ClientId::Cursor]
    );
}

#[test]
fn add_json_duplicate_is_reported_before_parsing() {
    let fixture = Fixture::new();
    fixture.init();
    let store = fixture.store();

    let added = add_server_json(&store, "git", r#"{"command": "uvx", "args": ["mcp-server-git"]}"#)
        .unwrap();
    assert!(matches!(added, AddOutcome::Added { .. }));
    let before = fixture.config_text();

    let again = add_server_json(&store, "git", "{ this is not json").unwrap();
    assert_eq!(again, AddOutcome::AlreadyExists);
    assert_eq!(fixture.config_text(), before);
}

#[test]
fn add_json_rejects_invalid_payloads() {
    let fixture = Fixture::new();
    fixture.init();
    let store = fixture.store();

    let err = add_server_json(&store, "bad", "{ nope").unwrap_err();
    let typed = err.downcast_ref::<McpSyncError>().unwrap();
    assert!(typed.issues()[0].starts_with("Invalid JSON"));

    let err = add_server_json(&store, "bad", r#"{"args": "x"}"#).unwrap_err();
    let issues = err.downcast_ref::<McpSyncError>().unwrap().issues().join("\n");
    assert!(issues.contains("command: command is required"));
    assert!(issues.contains("args: expected array"));

    assert!(!store.require_project().unwrap().config.has_server("bad"));
}

#[test]
fn commands_without_config_fail_with_config_not_found() {
    let fixture = Fixture::new();

    let err = remove_server(&fixture.store(), "x").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<McpSyncError>(),
        Some(McpSyncError::ConfigNotFound { .. })
    ));
}

#[test]
fn add_keeps_hand_written_server_order() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.project().join(CONFIG_FILENAME),
        r#"{
  "mcpServers": {
    "zeta": {"command": "z", "env": {"B_KEY": "1", "A_KEY": "2"}},
    "alpha": {"command": "a"},
  }
}"#,
    )
    .unwrap();

    let outcome = add_server(&fixture.store(), "mid", ServerDefinition::new("m")).unwrap();
    assert!(matches!(outcome, AddOutcome::Added { .. }));

    let saved: serde_json::Value = serde_json::from_str(&fixture.config_text()).unwrap();
    let servers = saved["mcpServers"].as_object().unwrap();
    assert_eq!(
        servers.keys().collect::<Vec<_>>(),
        vec!["zeta", "alpha", "mid"]
    );
    let env = servers["zeta"]["env"].as_object().unwrap();
    assert_eq!(env.keys().collect::<Vec<_>>(), vec!["B_KEY", "A_KEY"]);
    assert_eq!(servers["mid"], serde_json::json!({"command": "m"}));
}

#[test]
fn toggle_and_remove_report_outcomes() {
    let fixture = Fixture::new();
    fixture.init();
    let store = fixture.store();
    add_server_json(&store, "fs", r#"{"command": "npx"}"#).unwrap();

    assert_eq!(
        set_server_disabled(&store, "fs", false).unwrap(),
        ToggleOutcome::AlreadyInState
    );
    assert!(matches!(
        set_server_disabled(&store, "fs", true).unwrap(),
        ToggleOutcome::Changed { .. }
    ));
    assert!(store.require_project().unwrap().config.server("fs").unwrap().disabled);
    assert_eq!(
        set_server_disabled(&store, "ghost", true).unwrap(),
        ToggleOutcome::NotFound
    );

    assert!(matches!(
        remove_server(&store, "fs").unwrap(),
        RemoveOutcome::Removed { .. }
    ));
    assert_eq!(remove_server(&store, "fs").unwrap(), RemoveOutcome::NotFound);
}

#[test]
fn import_copies_discovered_servers_into_new_config() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.project().join(".mcp.json"),
        r#"{"mcpServers": {
            "git": {"command": "uvx", "args": ["mcp-server-git"]},
            "remote": {"url": "https://example.com/mcp"}
        }}"#,
    )
    .unwrap();
    std::fs::create_dir_all(fixture.project().join(".cursor")).unwrap();
    std::fs::write(
        fixture.project().join(".cursor/mcp.json"),
        r#"{"mcpServers": {"git": {"command": "other"}, "fs": {"command": "npx"}}}"#,
    )
    .unwrap();

    let discovered = discover_servers(
        &fixture.registry(),
        &[ClientId::ClaudeCode, ClientId::Cursor],
    );
    let names: Vec<_> = discovered.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["git", "git", "fs"]);

    let report = import_servers(
        &fixture.store(),
        &discovered,
        &["git".to_string(), "fs".to_string()],
    )
    .unwrap();

    assert_eq!(report.path, fixture.project().join(CONFIG_FILENAME));
    assert_eq!(report.imported, vec!["git", "fs"]);
    let config = fixture.store().require_project().unwrap().config;
    assert_eq!(config.server("git").unwrap().command, "uvx");
    assert_eq!(config.server("fs").unwrap().command, "npx");
}

#[test]
fn template_skips_existing_servers() {
    let fixture = Fixture::new();
    fixture.init();
    let store = fixture.store();
    let template = find_template("minimal").unwrap();
    let first = template.server_names()[0];
    add_server_json(&store, first, r#"{"command": "custom"}"#).unwrap();

    let report = apply_template(&store, template).unwrap();

    assert_eq!(report.skipped, vec![first.to_string()]);
    assert_eq!(report.added.len(), template.server_names().len() - 1);
    let config = store.require_project().unwrap().config;
    assert_eq!(config.server(first).unwrap().command, "custom");
}

#[test]
fn validate_reports_schema_errors_and_env_warnings() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.project().join(CONFIG_FILENAME),
        r#"{"mcpServers": {
            "gh": {"command": "npx", "args": ["--token", "${env:ARG_TOKEN}"], "env": {"T": "${env:GITHUB_TOKEN}"}}
        }}"#,
    )
    .unwrap();
    let env = HashMap::from([("GITHUB_TOKEN".to_string(), String::new())]);

    let report = validate_config(&fixture.store(), &env).unwrap();
    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().any(|w| w.contains("GITHUB_TOKEN")));
    assert!(report.warnings.iter().any(|w| w.contains("ARG_TOKEN") && w.contains("(in args)")));

    std::fs::write(
        fixture.project().join(CONFIG_FILENAME),
        r#"{"mcpServers": {"gh": {"command": ""}}}"#,
    )
    .unwrap();
    let report = validate_config(&fixture.store(), &env).unwrap();
    assert!(!report.is_valid());
    assert!(report.errors[0].starts_with("Schema: "));

    std::fs::write(fixture.project().join(CONFIG_FILENAME), "{{{").unwrap();
    let report = validate_config(&fixture.store(), &env).unwrap();
    assert_eq!(report.errors, vec!["Config file contains invalid JSON"]);
}
