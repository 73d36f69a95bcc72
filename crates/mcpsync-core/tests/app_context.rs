use mcpsync_core::config::CONFIG_FILENAME;
use mcpsync_core::context::AppContext;
use mcpsync_core::types::{ClientId, ClientScope};
use tempfile::TempDir;

fn context(temp: &TempDir) -> AppContext {
    AppContext::new(
        temp.path().join("home"),
        temp.path().join("project"),
        temp.path().join("home/.mcpsync"),
    )
}

#[test]
fn app_context_creates_from_paths() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);

    assert_eq!(ctx.home_dir(), temp.path().join("home"));
    assert_eq!(ctx.cwd(), temp.path().join("project"));
    assert_eq!(ctx.global_dir(), temp.path().join("home/.mcpsync"));
    assert_eq!(ctx.config_filename(), CONFIG_FILENAME);
}

#[test]
fn app_context_threads_config_filename_into_store() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp).with_config_filename("servers.json");

    let store = ctx.config_store();
    assert_eq!(store.filename(), "servers.json");
    assert_eq!(store.start_dir(), temp.path().join("project"));
    assert_eq!(
        store.global_config_path(),
        temp.path().join("home/.mcpsync/config.json")
    );
}

#[test]
fn app_context_provides_manifest_store() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);

    let manifest = ctx.manifest_store();
    assert_eq!(
        manifest.path(),
        temp.path().join("home/.mcpsync/sync-manifest.json")
    );
    assert!(manifest.load().unwrap().is_empty());
}

#[test]
fn app_context_registry_uses_given_project_dir() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    let elsewhere = temp.path().join("elsewhere");

    let registry = ctx.client_registry(&elsewhere);
    let cursor = registry.adapter(ClientId::Cursor);

    assert_eq!(cursor.scope(), ClientScope::Project);
    assert_eq!(cursor.config_path(), elsewhere.join(".cursor/mcp.json"));
}
