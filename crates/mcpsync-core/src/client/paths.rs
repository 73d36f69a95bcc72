//! Per-client configuration file locations.

use std::path::{Path, PathBuf};

use crate::types::{ClientId, ClientScope};

/// Base directories used to derive client config paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPaths {
    pub home_dir: PathBuf,
    /// `%APPDATA%`, `~/Library/Application Support` or `$XDG_CONFIG_HOME`.
    pub app_data_dir: PathBuf,
    pub project_dir: PathBuf,
}

impl ClientPaths {
    pub fn new(
        home_dir: impl Into<PathBuf>,
        app_data_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            home_dir: home_dir.into(),
            app_data_dir: app_data_dir.into(),
            project_dir: project_dir.into(),
        }
    }

    /// Use the platform app-data directory, falling back to `~/.config`.
    pub fn detect(home_dir: &Path, project_dir: &Path) -> Self {
        let app_data_dir = dirs::config_dir().unwrap_or_else(|| home_dir.join(".config"));
        Self::new(home_dir, app_data_dir, project_dir)
    }

    pub fn config_path(&self, client: ClientId, scope: ClientScope) -> PathBuf {
        match (client, scope) {
            (ClientId::ClaudeDesktop, _) => self.claude_desktop_path(),
            (ClientId::Cursor, ClientScope::Global) => self.home_dir.join(".cursor").join("mcp.json"),
            (ClientId::Cursor, ClientScope::Project) => {
                self.project_dir.join(".cursor").join("mcp.json")
            }
            (ClientId::ClaudeCode, ClientScope::Global) => self.home_dir.join(".claude.json"),
            (ClientId::ClaudeCode, ClientScope::Project) => self.project_dir.join(".mcp.json"),
        }
    }

    fn claude_desktop_path(&self) -> PathBuf {
        let base = if cfg!(any(windows, target_os = "macos")) {
            self.app_data_dir.clone()
        } else {
            self.home_dir.join(".config")
        };
        base.join("Claude").join("claude_desktop_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ClientPaths {
        ClientPaths::new("/home/u", "/appdata", "/proj/x")
    }

    #[test]
    fn project_scoped_paths() {
        let p = paths();
        assert_eq!(
            p.config_path(ClientId::Cursor, ClientScope::Project),
            PathBuf::from("/proj/x/.cursor/mcp.json")
        );
        assert_eq!(
            p.config_path(ClientId::ClaudeCode, ClientScope::Project),
            PathBuf::from("/proj/x/.mcp.json")
        );
    }

    #[test]
    fn global_scoped_paths() {
        let p = paths();
        assert_eq!(
            p.config_path(ClientId::Cursor, ClientScope::Global),
            PathBuf::from("/home/u/.cursor/mcp.json")
        );
        assert_eq!(
            p.config_path(ClientId::ClaudeCode, ClientScope::Global),
            PathBuf::from("/home/u/.claude.json")
        );
    }

    #[test]
    fn claude_desktop_ignores_scope() {
        let p = paths();
        assert_eq!(
            p.config_path(ClientId::ClaudeDesktop, ClientScope::Project),
            p.config_path(ClientId::ClaudeDesktop, ClientScope::Global)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn claude_desktop_on_linux_uses_home_config() {
        assert_eq!(
            paths().config_path(ClientId::ClaudeDesktop, ClientScope::Global),
            PathBuf::from("/home/u/.config/Claude/claude_desktop_config.json")
        );
    }
}
