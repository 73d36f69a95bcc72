use mcpsync_core::config::{CONFIG_FILENAME, ConfigStore, SCHEMA_URL, ServerDefinition};
use mcpsync_core::error::McpSyncError;
use mcpsync_core::types::ClientId;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    project: std::path::PathBuf,
    global_dir: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        let global_dir = temp.path().join("home/.mcpsync");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::create_dir_all(&global_dir).unwrap();
        Self {
            _temp: temp,
            project,
            global_dir,
        }
    }

    fn store_at(&self, start: &std::path::Path) -> ConfigStore {
        ConfigStore::new(CONFIG_FILENAME, start, &self.global_dir)
    }

    fn store(&self) -> ConfigStore {
        self.store_at(&self.project)
    }

    fn write_project(&self, content: &str) {
        std::fs::write(self.project.join(CONFIG_FILENAME), content).unwrap();
    }

    fn write_global(&self, content: &str) {
        std::fs::write(self.global_dir.join("config.json"), content).unwrap();
    }
}

#[test]
fn missing_config_is_config_not_found() {
    let fixture = Fixture::new();

    let err = fixture.store().require_project().unwrap_err();
    let typed = err.downcast_ref::<McpSyncError>().unwrap();

    assert!(matches!(typed, McpSyncError::ConfigNotFound { .. }));
    let message = err.to_string();
    assert!(message.contains(CONFIG_FILENAME));
    assert!(message.contains(&fixture.project.display().to_string()));
}

#[test]
fn config_is_discovered_from_nested_directory() {
    let fixture = Fixture::new();
    fixture.write_project(r#"{"mcpServers": {"fs": {"command": "npx"}}}"#);
    let nested = fixture.project.join("src/deep");
    std::fs::create_dir_all(&nested).unwrap();

    let loaded = fixture.store_at(&nested).require_project().unwrap();

    assert_eq!(loaded.path, fixture.project.join(CONFIG_FILENAME));
    assert_eq!(loaded.dir(), fixture.project.as_path());
    assert!(loaded.config.has_server("fs"));
}

#[test]
fn trailing_commas_are_tolerated() {
    let fixture = Fixture::new();
    fixture.write_project(
        r#"{
            "mcpServers": {
                "fs": { "command": "npx", "args": ["-y", "pkg",], },
            },
        }"#,
    );

    let loaded = fixture.store().require_project().unwrap();
    assert_eq!(loaded.config.server("fs").unwrap().args, vec!["-y", "pkg"]);
}

#[test]
fn schema_errors_carry_field_paths() {
    let fixture = Fixture::new();
    fixture.write_project(r#"{"mcpServers": {"bad": {"args": "nope"}}}"#);

    let err = fixture.store().require_project().unwrap_err();
    let typed = err.downcast_ref::<McpSyncError>().unwrap();

    let issues = typed.issues().join("\n");
    assert!(issues.contains("mcpServers.bad.command"));
    assert!(issues.contains("mcpServers.bad.args"));
}

#[test]
fn merged_view_prefers_project_entries() {
    let fixture = Fixture::new();
    fixture.write_global(
        r#"{"mcpServers": {
            "shared": {"command": "global-cmd"},
            "global-only": {"command": "g"}
        }}"#,
    );
    fixture.write_project(
        r#"{"mcpServers": {
            "shared": {"command": "project-cmd"},
            "project-only": {"command": "p"}
        }, "sync": {"clients": ["cursor"]}}"#,
    );

    let merged = fixture.store().load_merged().unwrap();

    assert_eq!(merged.server("shared").unwrap().command, "project-cmd");
    assert!(merged.has_server("global-only"));
    assert!(merged.has_server("project-only"));
    assert_eq!(merged.sync_targets(), vec![ClientId::Cursor]);
}

#[test]
fn merged_view_without_any_file_is_empty() {
    let fixture = Fixture::new();

    let merged = fixture.store().load_merged().unwrap();

    assert!(merged.servers.is_empty());
    assert_eq!(merged.sync_targets(), ClientId::ALL.to_vec());
}

#[test]
fn save_writes_schema_and_round_trips() {
    let fixture = Fixture::new();
    fixture.write_project(r#"{"mcpServers": {}}"#);
    let store = fixture.store();

    let loaded = store.require_project().unwrap();
    let updated = loaded.config.with_server(
        "github",
        ServerDefinition::new("npx").with_env("GITHUB_TOKEN", "${env:GITHUB_TOKEN}"),
    );
    let path = store.save_project(&updated).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["$schema"], SCHEMA_URL);
    assert_eq!(
        raw["mcpServers"]["github"]["env"]["GITHUB_TOKEN"],
        "${env:GITHUB_TOKEN}"
    );

    let reloaded = store.require_project().unwrap();
    assert_eq!(reloaded.config.servers, updated.servers);
}
