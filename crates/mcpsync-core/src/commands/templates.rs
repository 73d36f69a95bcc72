//! Built-in server templates applied with `use <template>`.

use std::path::PathBuf;

use crate::config::{CanonicalConfig, ConfigStore, ServerDefinition, ServerMap};

struct TemplateServer {
    name: &'static str,
    command: &'static str,
    args: &'static [&'static str],
    env: &'static [(&'static str, &'static str)],
}

const FILESYSTEM: TemplateServer = TemplateServer {
    name: "filesystem",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-filesystem", "${workspaceFolder}"],
    env: &[],
};

const GITHUB: TemplateServer = TemplateServer {
    name: "github",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-github"],
    env: &[("GITHUB_TOKEN", "${env:GITHUB_TOKEN}")],
};

const PUPPETEER: TemplateServer = TemplateServer {
    name: "puppeteer",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-puppeteer"],
    env: &[],
};

const MEMORY: TemplateServer = TemplateServer {
    name: "memory",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-memory"],
    env: &[],
};

const POSTGRES: TemplateServer = TemplateServer {
    name: "postgres",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-postgres", "${env:DATABASE_URL}"],
    env: &[],
};

const SQLITE: TemplateServer = TemplateServer {
    name: "sqlite",
    command: "npx",
    args: &["-y", "@modelcontextprotocol/server-sqlite", "${workspaceFolder}/data.db"],
    env: &[],
};

const DOCKER: TemplateServer = TemplateServer {
    name: "docker-mcp",
    command: "npx",
    args: &["-y", "docker-mcp"],
    env: &[],
};

pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    servers: &'static [TemplateServer],
}

impl Template {
    /// Server names in catalog order.
    pub fn server_names(&self) -> Vec<&'static str> {
        self.servers.iter().map(|s| s.name).collect()
    }

    pub fn servers(&self) -> ServerMap {
        self.servers
            .iter()
            .map(|s| {
                let mut server = ServerDefinition::new(s.command).with_args(s.args.iter().copied());
                for (key, value) in s.env {
                    server = server.with_env(*key, *value);
                }
                (s.name.to_string(), server)
            })
            .collect()
    }
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "web",
        description: "Web development (filesystem, GitHub, Puppeteer)",
        servers: &[FILESYSTEM, GITHUB, PUPPETEER],
    },
    Template {
        name: "python",
        description: "Python / ML stack (filesystem, GitHub, memory)",
        servers: &[FILESYSTEM, GITHUB, MEMORY],
    },
    Template {
        name: "fullstack",
        description: "Full-stack (filesystem, GitHub, Postgres, Puppeteer, memory)",
        servers: &[FILESYSTEM, GITHUB, POSTGRES, PUPPETEER, MEMORY],
    },
    Template {
        name: "devops",
        description: "DevOps (filesystem, GitHub, Docker)",
        servers: &[FILESYSTEM, GITHUB, DOCKER],
    },
    Template {
        name: "minimal",
        description: "Just the essentials (filesystem, memory)",
        servers: &[FILESYSTEM, MEMORY],
    },
    Template {
        name: "data",
        description: "Data engineering (filesystem, Postgres, SQLite, memory)",
        servers: &[FILESYSTEM, POSTGRES, SQLITE, MEMORY],
    },
];

pub fn find_template(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub path: PathBuf,
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Add the template's servers that the project config does not have yet.
pub fn apply_template(store: &ConfigStore, template: &Template) -> anyhow::Result<TemplateReport> {
    let mut config = store
        .load_project()?
        .map(|loaded| loaded.config)
        .unwrap_or_else(CanonicalConfig::empty);

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    for (name, server) in template.servers() {
        if config.has_server(&name) {
            skipped.push(name);
        } else {
            config = config.with_server(name.clone(), server);
            added.push(name);
        }
    }

    let path = store.save_project(&config)?;
    tracing::info!(template = template.name, added = added.len(), "applied template");
    Ok(TemplateReport {
        path,
        added,
        skipped,
    })
}
