use std::collections::HashMap;

use mcpsync_core::config::{ServerDefinition, ServerMap};
use mcpsync_core::variables::{
    Platform, VariableContext, referenced_env_vars, resolve, resolve_all_servers,
};

fn ctx() -> VariableContext {
    VariableContext::new(
        "/work/app",
        "/home/dev",
        Platform::MacOs,
        HashMap::from([
            ("TOKEN".to_string(), "secret".to_string()),
            ("NESTED".to_string(), "${env:TOKEN}".to_string()),
        ]),
    )
}

#[test]
fn resolves_builtin_placeholders() {
    assert_eq!(
        resolve("${workspaceFolder}/data:${home}/.cache:${platform}", &ctx()),
        "/work/app/data:/home/dev/.cache:darwin"
    );
}

#[test]
fn missing_env_var_becomes_empty() {
    assert_eq!(resolve("Bearer ${env:UNSET_VAR}", &ctx()), "Bearer ");
}

#[test]
fn unknown_and_malformed_placeholders_stay_verbatim() {
    assert_eq!(resolve("${unknown} ${env:} ${open", &ctx()), "${unknown} ${env:} ${open");
}

#[test]
fn substitution_is_single_pass() {
    assert_eq!(resolve("${env:NESTED}", &ctx()), "${env:TOKEN}");
}

#[test]
fn resolves_every_server_field_but_env_keys() {
    let servers = ServerMap::from([(
        "fs".to_string(),
        ServerDefinition::new("${home}/bin/server")
            .with_args(["--root", "${workspaceFolder}"])
            .with_env("${env:TOKEN}", "${env:TOKEN}"),
    )]);

    let resolved = resolve_all_servers(&servers, &ctx());
    let fs = &resolved["fs"];

    assert_eq!(fs.command, "/home/dev/bin/server");
    assert_eq!(fs.args, vec!["--root", "/work/app"]);
    assert_eq!(fs.env.get("${env:TOKEN}").map(String::as_str), Some("secret"));
}

#[test]
fn referenced_vars_are_sorted_and_unique() {
    let servers = ServerMap::from([
        (
            "a".to_string(),
            ServerDefinition::new("npx").with_env("K", "${env:ZED}-${env:ALPHA}"),
        ),
        (
            "b".to_string(),
            ServerDefinition::new("npx").with_args(["${env:ALPHA}"]),
        ),
    ]);

    assert_eq!(referenced_env_vars(&servers), vec!["ALPHA", "ZED"]);
}
