//! Audit of environment variables referenced by `${env:NAME}`.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::CanonicalConfig;
use crate::variables::referenced_env_vars;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVarStatus {
    pub name: String,
    pub set: bool,
    pub masked: Option<String>,
}

/// Status of every variable referenced by `config`, sorted by name.
pub fn audit_env(config: &CanonicalConfig, env: &HashMap<String, String>) -> Vec<EnvVarStatus> {
    referenced_env_vars(&config.servers)
        .into_iter()
        .map(|name| {
            let value = env.get(&name).filter(|v| !v.is_empty());
            EnvVarStatus {
                set: value.is_some(),
                masked: value.map(|v| mask_value(v)),
                name,
            }
        })
        .collect()
}

/// `abcd****wxyz` for values longer than 8 characters, `****` otherwise.
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerDefinition;

    #[test]
    fn masks_long_and_short_values() {
        assert_eq!(mask_value("abcdefghijklwxyz"), "abcd****wxyz");
        assert_eq!(mask_value("short"), "****");
        assert_eq!(mask_value("12345678"), "****");
    }

    #[test]
    fn audit_reports_each_reference_once() {
        let config = CanonicalConfig::empty()
            .with_server(
                "a",
                ServerDefinition::new("npx").with_env("TOKEN", "${env:GITHUB_TOKEN}"),
            )
            .with_server(
                "b",
                ServerDefinition::new("npx").with_args(["${env:GITHUB_TOKEN}", "${env:EMPTY}"]),
            );
        let env = HashMap::from([
            ("GITHUB_TOKEN".to_string(), "ghp_1234567890abcd".to_string()),
            ("EMPTY".to_string(), String::new()),
        ]);

        let statuses = audit_env(&config, &env);

        assert_eq!(
            statuses,
            vec![
                EnvVarStatus {
                    name: "EMPTY".into(),
                    set: false,
                    masked: None
                },
                EnvVarStatus {
                    name: "GITHUB_TOKEN".into(),
                    set: true,
                    masked: Some("ghp_****abcd".into())
                },
            ]
        );
    }
}
