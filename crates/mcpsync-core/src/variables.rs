//! `${...}` placeholder substitution for server definitions.
//!
//! Recognized tokens:
//! - `${workspaceFolder}`: directory holding the canonical config
//! - `${home}`: user home directory
//! - `${platform}`: `win32`, `darwin`, `linux` or the OS name
//! - `${env:NAME}`: process environment value, empty when unset
//!
//! Anything else inside `${...}` is left as written. Substitution is a single
//! left-to-right pass, so substituted values are never re-scanned.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{ServerDefinition, ServerMap};

/// Host platform as rendered by `${platform}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("win32"),
            Platform::MacOs => f.write_str("darwin"),
            Platform::Linux => f.write_str("linux"),
            Platform::Other(name) => f.write_str(name),
        }
    }
}

/// Values available to placeholder substitution.
#[derive(Debug, Clone)]
pub struct VariableContext {
    pub workspace_folder: PathBuf,
    pub home: PathBuf,
    pub platform: Platform,
    pub env: HashMap<String, String>,
}

impl VariableContext {
    pub fn new(
        workspace_folder: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        platform: Platform,
        env: HashMap<String, String>,
    ) -> Self {
        Self {
            workspace_folder: workspace_folder.into(),
            home: home.into(),
            platform,
            env,
        }
    }

    /// Snapshot the current process for resolving a config stored in `config_dir`.
    pub fn capture(config_dir: &Path, home: &Path) -> Self {
        Self::new(
            config_dir,
            home,
            Platform::current(),
            process_env(),
        )
    }
}

/// The process environment, skipping entries that are not valid UTF-8.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

enum Token<'a> {
    Literal(&'a str),
    Placeholder { raw: &'a str, name: &'a str },
}

/// Split `input` into literal runs and complete `${...}` placeholders.
fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        if start > 0 {
            tokens.push(Token::Literal(&rest[..start]));
        }
        tokens.push(Token::Placeholder {
            raw: &rest[start..start + 2 + end + 1],
            name: &after[..end],
        });
        rest = &after[end + 1..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Literal(rest));
    }
    tokens
}

fn env_name(placeholder: &str) -> Option<&str> {
    placeholder
        .strip_prefix("env:")
        .filter(|name| !name.is_empty())
}

/// Substitute every recognized placeholder in `template`.
pub fn resolve(template: &str, ctx: &VariableContext) -> String {
    let mut out = String::with_capacity(template.len());
    for token in tokenize(template) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Placeholder { raw, name } => match name {
                "workspaceFolder" => out.push_str(&ctx.workspace_folder.to_string_lossy()),
                "home" => out.push_str(&ctx.home.to_string_lossy()),
                "platform" => out.push_str(&ctx.platform.to_string()),
                other => match env_name(other) {
                    Some(var) => {
                        if let Some(value) = ctx.env.get(var) {
                            out.push_str(value);
                        }
                    }
                    None => out.push_str(raw),
                },
            },
        }
    }
    out
}

/// Resolve `command`, each arg and each env value. Env keys are untouched.
pub fn resolve_server(server: &ServerDefinition, ctx: &VariableContext) -> ServerDefinition {
    ServerDefinition {
        command: resolve(&server.command, ctx),
        args: server.args.iter().map(|arg| resolve(arg, ctx)).collect(),
        env: server
            .env
            .iter()
            .map(|(key, value)| (key.clone(), resolve(value, ctx)))
            .collect(),
        disabled: server.disabled,
    }
}

pub fn resolve_all_servers(servers: &ServerMap, ctx: &VariableContext) -> ServerMap {
    servers
        .iter()
        .map(|(name, server)| (name.clone(), resolve_server(server, ctx)))
        .collect()
}

/// Names referenced via `${env:NAME}` in a single string.
pub fn env_references(value: &str) -> Vec<&str> {
    tokenize(value)
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder { name, .. } => env_name(name),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Sorted, de-duplicated `${env:NAME}` names across commands, args and env values.
pub fn referenced_env_vars(servers: &ServerMap) -> Vec<String> {
    let mut names = BTreeSet::new();
    for server in servers.values() {
        let fields = std::iter::once(&server.command)
            .chain(server.args.iter())
            .chain(server.env.values());
        for field in fields {
            names.extend(env_references(field).into_iter().map(str::to_string));
        }
    }
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> VariableContext {
        VariableContext::new(
            "/proj/x",
            "/home/u",
            Platform::Linux,
            HashMap::from([
                ("TOKEN".to_string(), "abc".to_string()),
                ("NESTED".to_string(), "${home}".to_string()),
            ]),
        )
    }

    #[test]
    fn plain_strings_are_unchanged() {
        assert_eq!(resolve("npx -y server", &ctx()), "npx -y server");
        assert_eq!(resolve("", &ctx()), "");
    }

    #[test]
    fn substitutes_known_tokens() {
        assert_eq!(resolve("${workspaceFolder}/src", &ctx()), "/proj/x/src");
        assert_eq!(resolve("${home}/.cache", &ctx()), "/home/u/.cache");
        assert_eq!(resolve("os-${platform}", &ctx()), "os-linux");
        assert_eq!(resolve("Bearer ${env:TOKEN}", &ctx()), "Bearer abc");
    }

    #[test]
    fn missing_env_var_becomes_empty() {
        assert_eq!(resolve("[${env:NOPE}]", &ctx()), "[]");
    }

    #[test]
    fn unknown_and_unterminated_tokens_stay_verbatim() {
        assert_eq!(resolve("${unknown}", &ctx()), "${unknown}");
        assert_eq!(resolve("${env:}", &ctx()), "${env:}");
        assert_eq!(resolve("tail ${home", &ctx()), "tail ${home");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        assert_eq!(resolve("${env:NESTED}", &ctx()), "${home}");
    }

    #[test]
    fn resolution_is_idempotent_for_resolved_output() {
        let once = resolve("${workspaceFolder}:${env:TOKEN}:${platform}", &ctx());
        assert_eq!(resolve(&once, &ctx()), once);
    }

    #[test]
    fn env_keys_are_not_substituted() {
        let server = ServerDefinition::new("${home}/bin/srv")
            .with_args(["--root", "${workspaceFolder}"])
            .with_env("${home}", "${env:TOKEN}")
            .with_disabled(true);

        let resolved = resolve_server(&server, &ctx());

        assert_eq!(resolved.command, "/home/u/bin/srv");
        assert_eq!(resolved.args, vec!["--root", "/proj/x"]);
        assert_eq!(resolved.env.get("${home}").map(String::as_str), Some("abc"));
        assert!(resolved.disabled);
    }

    #[test]
    fn platform_names() {
        assert_eq!(Platform::Windows.to_string(), "win32");
        assert_eq!(Platform::MacOs.to_string(), "darwin");
        assert_eq!(Platform::Other("freebsd".into()).to_string(), "freebsd");
    }

    #[test]
    fn collects_referenced_env_vars() {
        let servers = ServerMap::from([
            (
                "a".to_string(),
                ServerDefinition::new("x")
                    .with_args(["${env:B_VAR}"])
                    .with_env("K", "${env:A_VAR}-${env:B_VAR}"),
            ),
            ("b".to_string(), ServerDefinition::new("${env:C_VAR}")),
        ]);

        assert_eq!(referenced_env_vars(&servers), vec!["A_VAR", "B_VAR", "C_VAR"]);
    }
}
