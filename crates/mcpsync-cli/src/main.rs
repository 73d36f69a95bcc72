//! mcpsync - one MCP server config for every client
//!
//! Usage:
//!   mcpsync init          # Create .mcpsync.json in the current directory
//!   mcpsync add <name>    # Add a server (prompts when no command is given)
//!   mcpsync sync          # Write servers into every client config
//!   mcpsync doctor        # Health check every configured server

mod prompts;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpsync_core::commands::{
    AddOutcome, ConfigWatcher, InitOutcome, RemoveOutcome, TEMPLATES, ToggleOutcome, add_server,
    add_server_json, apply_template, audit_env, discover_servers, find_template, import_servers,
    init_config, remove_server, set_server_disabled, validate_config,
};
use mcpsync_core::config::{ConfigStore, EnvMap, LoadedConfig, ServerMap};
use mcpsync_core::context::AppContext;
use mcpsync_core::health::{HealthChecker, HealthResult, HealthStatus, check_dependencies};
use mcpsync_core::sync::{
    DiffStatus, SyncOptions, SyncResult, diff_clients, export_servers, resolve_enabled,
};
use mcpsync_core::types::ClientId;
use mcpsync_core::variables::process_env;

use crate::prompts::{AddServerFlow, PrefilledServer};

#[derive(Parser)]
#[command(name = "mcpsync")]
#[command(about = "Sync one MCP server config to Claude Desktop, Cursor and Claude Code", long_about = None)]
#[command(version)]
struct Cli {
    /// Canonical config filename to look for
    #[arg(long, global = true, value_name = "FILE")]
    config_name: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file in the current directory
    Init {
        /// Skip prompts and sync to every client
        #[arg(short = 'y', long)]
        yes: bool,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Add a server to the project config
    Add {
        /// Server name
        name: String,
        /// Server command (e.g. npx, node, uvx)
        #[arg(short, long)]
        command: Option<String>,
        /// Server arguments
        #[arg(short, long, num_args = 1.., allow_hyphen_values = true)]
        args: Option<Vec<String>>,
        /// Environment variables
        #[arg(short, long, value_name = "KEY=VALUE", num_args = 1..)]
        env: Vec<String>,
        /// Add the server disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Add a server from a JSON object
    AddJson {
        /// Server name
        name: String,
        /// Server definition, e.g. '{"command":"npx","args":["-y","pkg"]}'
        json: String,
    },

    /// Remove a server from the project config
    #[command(alias = "rm")]
    Remove {
        /// Server name
        name: String,
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Enable a disabled server
    Enable {
        /// Server name
        name: String,
    },

    /// Disable a server without removing it
    Disable {
        /// Server name
        name: String,
    },

    /// List configured servers
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Quick overview of configured servers
    Status,

    /// Write enabled servers into client configs
    Sync {
        /// Show what would be written without touching any file
        #[arg(long)]
        dry: bool,
        /// Only sync these clients
        #[arg(long = "client", value_name = "CLIENT", num_args = 1..)]
        clients: Vec<ClientId>,
    },

    /// Compare the project config with client configs
    Diff {
        /// Only diff this client
        #[arg(long)]
        client: Option<ClientId>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Import servers already configured in clients
    Import {
        /// Only import from this client
        #[arg(long)]
        from: Option<ClientId>,
        /// Import everything found without prompting
        #[arg(long)]
        all: bool,
    },

    /// Print resolved servers as client JSON
    Export {
        /// Client whose format to emit
        #[arg(long, default_value = "claude-desktop")]
        client: ClientId,
        /// Emit the server map without the mcpServers wrapper
        #[arg(long)]
        raw: bool,
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Audit environment variables referenced in the config
    Env {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Apply a preset server template
    Use {
        /// Template name
        template: Option<String>,
        /// List available templates
        #[arg(long)]
        list: bool,
    },

    /// Validate the config in the current directory
    Validate {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Health check configured servers
    Doctor {
        /// Only check this server
        #[arg(long)]
        server: Option<String>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
        /// Per-server timeout in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },

    /// Re-sync whenever the config file changes
    Watch {
        /// Only sync these clients
        #[arg(long = "client", value_name = "CLIENT", num_args = 1..)]
        clients: Vec<ClientId>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so piped stdout stays clean
    let default_filter = if cli.verbose {
        "mcpsync_core=debug,warn"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn report_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", style("Error:").red().bold(), err);
    if std::env::var_os("MCPSYNC_DEBUG").is_some() {
        eprintln!();
        eprintln!("{err:?}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = AppContext::from_env()?;
    if let Some(name) = cli.config_name {
        ctx = ctx.with_config_filename(name);
    }
    run_cli(&ctx, cli.command)
}

fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Init { yes, force } => run_init(ctx, yes, force),
        Commands::Add {
            name,
            command,
            args,
            env,
            disabled,
        } => {
            let prefilled = PrefilledServer {
                command,
                args,
                env: parse_env_pairs(&env)?,
                disabled,
                yes: false,
            };
            run_add(ctx, &name, prefilled)
        }
        Commands::AddJson { name, json } => run_add_json(ctx, &name, &json),
        Commands::Remove { name, yes } => run_remove(ctx, &name, yes),
        Commands::Enable { name } => run_toggle(ctx, &name, false),
        Commands::Disable { name } => run_toggle(ctx, &name, true),
        Commands::List { format } => run_list(ctx, format),
        Commands::Status => run_status(ctx),
        Commands::Sync { dry, clients } => run_sync(ctx, dry, clients),
        Commands::Diff { client, format } => run_diff(ctx, client, format),
        Commands::Import { from, all } => run_import(ctx, from, all),
        Commands::Export {
            client,
            raw,
            compact,
        } => run_export(ctx, client, raw, compact),
        Commands::Env { format } => run_env(ctx, format),
        Commands::Use { template, list } => run_use(ctx, template, list),
        Commands::Validate { format } => run_validate(ctx, format),
        Commands::Doctor {
            server,
            format,
            timeout_ms,
        } => run_doctor(ctx, server, format, Duration::from_millis(timeout_ms)),
        Commands::Watch { clients } => run_watch(ctx, clients),
    }
}

// =============================================================================
// Config editing
// =============================================================================

fn run_init(ctx: &AppContext, yes: bool, force: bool) -> Result<()> {
    let store = ctx.config_store();
    let existing = ctx.cwd().join(store.filename());
    if existing.is_file() && !force {
        println!(
            "⚠ {} already exists. Use --force to overwrite.",
            store.filename()
        );
        return Ok(());
    }

    let clients = if yes {
        ClientId::ALL.to_vec()
    } else {
        prompts::prompt_clients()?
    };

    match init_config(&store, clients.clone(), force)? {
        InitOutcome::Created { path } => {
            println!("✓ Created {}", path.display());
            let names: Vec<_> = clients.iter().map(|c| c.as_str()).collect();
            println!("  Sync targets: {}", names.join(", "));
            println!();
            println!("Next: mcpsync add <name>, or mcpsync use <template>");
        }
        InitOutcome::AlreadyExists { path } => {
            println!(
                "⚠ {} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }
    Ok(())
}

fn run_add(ctx: &AppContext, name: &str, prefilled: PrefilledServer) -> Result<()> {
    let store = ctx.config_store();
    let loaded = store.require_project()?;
    if loaded.config.has_server(name) {
        println!("⚠ Server '{name}' already exists. Remove it first.");
        return Ok(());
    }

    let result = AddServerFlow::new(name, prefilled).collect()?;
    if !result.confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    match add_server(&store, name, result.server)? {
        AddOutcome::Added { path } => {
            println!("✓ Added server '{name}' to {}", path.display());
        }
        AddOutcome::AlreadyExists => {
            println!("⚠ Server '{name}' already exists. Remove it first.");
        }
    }
    Ok(())
}

fn run_add_json(ctx: &AppContext, name: &str, json: &str) -> Result<()> {
    match add_server_json(&ctx.config_store(), name, json)? {
        AddOutcome::Added { path } => {
            println!("✓ Added server '{name}' to {}", path.display());
        }
        AddOutcome::AlreadyExists => {
            println!("⚠ Server '{name}' already exists. Remove it first.");
        }
    }
    Ok(())
}

fn run_remove(ctx: &AppContext, name: &str, yes: bool) -> Result<()> {
    let store = ctx.config_store();
    let loaded = store.require_project()?;
    if !loaded.config.has_server(name) {
        println!("⚠ Server '{name}' not found in config.");
        return Ok(());
    }

    if !yes && !prompts::confirm(&format!("Remove server '{name}'?"))? {
        return Ok(());
    }

    match remove_server(&store, name)? {
        RemoveOutcome::Removed { .. } => println!("✓ Removed server '{name}'"),
        RemoveOutcome::NotFound => println!("⚠ Server '{name}' not found in config."),
    }
    Ok(())
}

fn run_toggle(ctx: &AppContext, name: &str, disabled: bool) -> Result<()> {
    let state = if disabled { "disabled" } else { "enabled" };
    match set_server_disabled(&ctx.config_store(), name, disabled)? {
        ToggleOutcome::Changed { .. } => {
            println!("✓ Server '{name}' {state}");
            println!("  Run mcpsync sync to apply");
        }
        ToggleOutcome::AlreadyInState => println!("• Server '{name}' is already {state}"),
        ToggleOutcome::NotFound => println!("⚠ Server '{name}' not found in config."),
    }
    Ok(())
}

fn run_import(ctx: &AppContext, from: Option<ClientId>, all: bool) -> Result<()> {
    let clients = from.map_or_else(|| ClientId::ALL.to_vec(), |id| vec![id]);
    let registry = ctx.client_registry(ctx.cwd());
    let discovered = discover_servers(&registry, &clients);

    if discovered.is_empty() {
        println!("No MCP servers found in any client config.");
        return Ok(());
    }

    println!("Found {} server(s):", discovered.len());
    for found in &discovered {
        println!(
            "  • {} {}",
            found.name,
            style(format!("from {}", found.source.display_name())).dim()
        );
    }
    println!();

    let picked = if all {
        discovered.iter().map(|d| d.name.clone()).collect()
    } else {
        prompts::prompt_import_selection(&discovered)?
    };
    let selected = unique(picked);

    if selected.is_empty() {
        println!("No servers selected.");
        return Ok(());
    }

    let report = import_servers(&ctx.config_store(), &discovered, &selected)?;
    println!(
        "✓ Imported {} server(s) into {}",
        report.imported.len(),
        report.path.display()
    );
    println!("  Run mcpsync list to see them, mcpsync sync to sync to clients");
    Ok(())
}

fn run_use(ctx: &AppContext, template: Option<String>, list: bool) -> Result<()> {
    let Some(name) = template.filter(|_| !list) else {
        print_templates();
        return Ok(());
    };

    let Some(template) = find_template(&name) else {
        let names: Vec<_> = TEMPLATES.iter().map(|t| t.name).collect();
        anyhow::bail!(
            "Template '{}' not found. Available: {}",
            name,
            names.join(", ")
        );
    };

    let report = apply_template(&ctx.config_store(), template)?;
    println!(
        "✓ Applied template '{}' to {}",
        template.name,
        report.path.display()
    );
    for name in &report.added {
        println!("  + {name}");
    }
    for name in &report.skipped {
        println!("  {} {}", name, style("(already configured)").dim());
    }
    println!();
    println!("Run mcpsync sync to push to your clients");
    Ok(())
}

fn print_templates() {
    println!("{:<12} Description", "Template");
    println!("{}", "-".repeat(60));
    for template in TEMPLATES {
        println!("{:<12} {}", template.name, template.description);
        println!(
            "{:<12} {}",
            "",
            style(template.server_names().join(", ")).dim()
        );
    }
    println!();
    println!("Usage: mcpsync use <template>");
}

// =============================================================================
// Inspection
// =============================================================================

fn run_list(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let config = ctx.config_store().load_merged()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config.servers)?);
        }
        OutputFormat::Table => {
            if config.servers.is_empty() {
                println!("No servers configured. Run mcpsync add <name> to add one.");
                return Ok(());
            }

            println!("{:<3} {:<20} {:<15} Args", "", "Server", "Command");
            println!("{}", "-".repeat(70));
            for (name, server) in &config.servers {
                println!(
                    "{:<3} {:<20} {:<15} {}",
                    state_dot(server.is_enabled()),
                    truncate(name, 20),
                    truncate(&server.command, 15),
                    truncate(&server.args.join(" "), 40)
                );
            }
            println!();
            println!("{} server(s) configured", config.servers.len());
        }
    }
    Ok(())
}

fn run_status(ctx: &AppContext) -> Result<()> {
    let config = ctx.config_store().load_merged()?;
    if config.servers.is_empty() {
        println!("No servers configured.");
        return Ok(());
    }

    for (name, server) in &config.servers {
        let state = if server.is_enabled() {
            style("enabled").green()
        } else {
            style("disabled").dim()
        };
        println!("  {} {} → {}", state_dot(server.is_enabled()), name, state);
    }

    let enabled = config.enabled_servers().len();
    let targets: Vec<_> = config.sync_targets().iter().map(|c| c.as_str()).collect();
    println!();
    println!(
        "{} enabled, {} disabled",
        enabled,
        config.servers.len() - enabled
    );
    println!("Sync targets: {}", targets.join(", "));

    let detected: Vec<_> = ctx
        .client_registry(&ctx.config_store().config_dir())
        .detect_installed()
        .iter()
        .map(|adapter| adapter.display_name())
        .collect();
    if !detected.is_empty() {
        println!("Client configs found: {}", detected.join(", "));
    }
    Ok(())
}

fn run_env(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let config = ctx.config_store().load_merged()?;
    let statuses = audit_env(&config, &process_env());
    let found = statuses.iter().filter(|s| s.set).count();
    let missing = statuses.len() - found;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "variables": statuses,
                "summary": { "found": found, "missing": missing },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            if statuses.is_empty() {
                println!("No environment variables referenced in config.");
                return Ok(());
            }

            for status in &statuses {
                match &status.masked {
                    Some(masked) => println!(
                        "  {} {:<25} {} {}",
                        state_dot(true),
                        status.name,
                        style("set").green(),
                        style(masked).dim()
                    ),
                    None => println!(
                        "  {} {:<25} {}",
                        style("●").red(),
                        status.name,
                        style("MISSING").red()
                    ),
                }
            }
            println!();
            if missing > 0 {
                println!("⚠ {missing} variable(s) missing; synced configs will contain empty values");
            } else {
                println!("✓ All {found} variable(s) are set");
            }
        }
    }
    Ok(())
}

fn run_validate(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let report = validate_config(&ctx.config_store(), &process_env())?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": report.path,
                "valid": report.is_valid(),
                "errors": report.errors,
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            for error in &report.errors {
                println!("  ✗ {error}");
            }
            for warning in &report.warnings {
                println!("  ⚠ {warning}");
            }
            if report.is_valid() {
                println!("✓ {} is valid", report.path.display());
            }
        }
    }

    if !report.is_valid() {
        anyhow::bail!("{} validation error(s)", report.errors.len());
    }
    Ok(())
}

fn run_doctor(
    ctx: &AppContext,
    server: Option<String>,
    format: OutputFormat,
    timeout: Duration,
) -> Result<()> {
    let config = ctx.config_store().load_merged()?;
    let servers = match &server {
        Some(name) => {
            let definition = config
                .server(name)
                .ok_or_else(|| anyhow::anyhow!("Server '{}' not found", name))?;
            ServerMap::from([(name.clone(), definition.clone())])
        }
        None => config.servers.clone(),
    };

    let checker = HealthChecker::new().with_timeout(timeout);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (deps, results) = runtime.block_on(async {
        tokio::join!(check_dependencies(), checker.check_all_servers(&servers))
    });
    let healthy = results.iter().filter(|r| r.is_healthy()).count();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "dependencies": deps,
                "servers": results,
                "summary": { "healthy": healthy, "total": results.len() },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("{}", style("System Dependencies").bold());
            for dep in &deps {
                if dep.found {
                    println!(
                        "  ✓ {} {}",
                        dep.tool,
                        style(dep.version.as_deref().unwrap_or("")).dim()
                    );
                } else {
                    println!("  ⚠ {} {}", dep.tool, style("not found").dim());
                }
            }
            println!();

            if results.is_empty() {
                println!("No servers to check.");
                return Ok(());
            }

            println!("{}", style("MCP Servers").bold());
            for result in &results {
                print_health_line(result);
            }
            println!();
            println!("{}/{} server(s) healthy", healthy, results.len());
        }
    }
    Ok(())
}

fn print_health_line(result: &HealthResult) {
    let detail = result.error.as_deref().unwrap_or("unknown error");
    match result.status {
        HealthStatus::Healthy => {
            let latency = result.latency_ms.unwrap_or_default();
            let info = result
                .server_info
                .as_ref()
                .map(|info| format!("({} v{})", info.name, info.version))
                .unwrap_or_default();
            println!(
                "  ✓ {} {} {}",
                result.server,
                style(format!("{latency}ms")).dim(),
                style(info).dim()
            );
        }
        HealthStatus::Timeout => println!("  ⚠ {} {}", result.server, style("timed out").dim()),
        HealthStatus::NotFound | HealthStatus::Unhealthy | HealthStatus::Error => {
            println!(
                "  ✗ {} [{}] {}",
                result.server,
                result.status.as_str(),
                style(detail).dim()
            );
        }
    }
}

// =============================================================================
// Sync
// =============================================================================

fn run_sync(ctx: &AppContext, dry: bool, clients: Vec<ClientId>) -> Result<()> {
    let loaded = ctx.config_store().require_project()?;
    if loaded.config.enabled_servers().is_empty() {
        println!("⚠ No enabled servers to sync. Add servers with mcpsync add.");
        return Ok(());
    }

    if dry {
        println!("Dry run: no files will be modified");
        println!();
    }

    let results = sync_loaded(ctx, &loaded, &clients, dry);
    print_sync_results(&results);

    let succeeded = results.iter().filter(|r| r.success).count();
    println!();
    println!("Synced to {}/{} client(s)", succeeded, results.len());
    Ok(())
}

fn sync_loaded(
    ctx: &AppContext,
    loaded: &LoadedConfig,
    clients: &[ClientId],
    dry_run: bool,
) -> Vec<SyncResult> {
    let mut options = SyncOptions::new().with_dry_run(dry_run);
    if !clients.is_empty() {
        options = options.with_clients(clients.to_vec());
    }
    ctx.sync_engine(loaded.dir())
        .sync(&loaded.config, loaded.dir(), &options)
}

fn print_sync_results(results: &[SyncResult]) {
    for result in results {
        let name = result.client.display_name();
        if result.success {
            println!(
                "  ✓ {} → {} server(s) {}",
                name,
                result.servers_written,
                style(result.path.display()).dim()
            );
            if let Some(backup) = &result.backup_path {
                println!("    {}", style(format!("backup: {}", backup.display())).dim());
            }
        } else {
            println!(
                "  ✗ {} → {}",
                name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn run_diff(ctx: &AppContext, client: Option<ClientId>, format: OutputFormat) -> Result<()> {
    let loaded = ctx.config_store().require_project()?;
    let engine = ctx.sync_engine(loaded.dir());
    let resolved = resolve_enabled(&loaded.config, &engine.variable_context(loaded.dir()));
    let clients = client.map_or_else(|| ClientId::ALL.to_vec(), |id| vec![id]);

    let diffs = diff_clients(engine.registry(), &resolved, &clients);
    let total: usize = diffs.iter().map(|d| d.pending_changes).sum();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "clients": diffs,
                "summary": { "totalDiffs": total },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            for client in &diffs {
                println!();
                println!(
                    "  {} {}",
                    style(&client.display_name).bold(),
                    style(client.path.display()).dim()
                );
                println!("  {}", "-".repeat(45));
                if !client.exists {
                    println!("  {}", style("No config file found").dim());
                }
                for diff in &client.diffs {
                    match diff.status {
                        DiffStatus::Added => println!(
                            "  {} {}",
                            style(format!("+ {}", diff.server)).green(),
                            style("(will be added)").dim()
                        ),
                        DiffStatus::Updated => println!(
                            "  {} {}",
                            style(format!("~ {}", diff.server)).yellow(),
                            style("(will be updated)").dim()
                        ),
                        DiffStatus::InSync => println!(
                            "    {} {}",
                            style(&diff.server).dim(),
                            style("✓ in sync").green()
                        ),
                        DiffStatus::ClientOnly => println!(
                            "    {} {}",
                            style(&diff.server).dim(),
                            style("(client-only, untouched)").dim()
                        ),
                    }
                }
                if client.exists && client.pending_changes == 0 {
                    println!("  {}", style("✓ All in sync").green());
                }
            }

            println!();
            if total == 0 {
                println!("✓ Everything is in sync");
            } else {
                println!("{total} change(s) pending; run mcpsync sync to apply");
            }
        }
    }
    Ok(())
}

fn run_export(ctx: &AppContext, client: ClientId, raw: bool, compact: bool) -> Result<()> {
    let loaded = ctx.config_store().require_project()?;
    let engine = ctx.sync_engine(loaded.dir());
    let resolved = resolve_enabled(&loaded.config, &engine.variable_context(loaded.dir()));
    tracing::debug!(client = %client, servers = resolved.len(), "exporting");

    let output = export_servers(&resolved, raw);
    let json = if compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{json}");
    Ok(())
}

fn run_watch(ctx: &AppContext, clients: Vec<ClientId>) -> Result<()> {
    let store = ctx.config_store();
    let loaded = store.require_project()?;
    let watcher = ConfigWatcher::new(&loaded.path)?;

    println!(
        "Watching {} for changes (Ctrl+C to stop)",
        style(loaded.path.display()).bold()
    );
    println!();

    let results = sync_loaded(ctx, &loaded, &clients, false);
    let synced = results.iter().filter(|r| r.success).count();
    println!("✓ Initial sync complete ({synced} client(s))");

    while watcher.wait_for_change() {
        let time = chrono::Local::now().format("%H:%M:%S");
        println!("{}", style(format!("[{time}] Change detected")).dim());
        resync(ctx, &store, &clients);
    }
    Ok(())
}

fn resync(ctx: &AppContext, store: &ConfigStore, clients: &[ClientId]) {
    let loaded = match store.load_project() {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            println!("⚠ Config file is gone");
            return;
        }
        Err(err) => {
            println!("⚠ Config file is invalid: {err:#}");
            return;
        }
    };

    let results = sync_loaded(ctx, &loaded, clients, false);
    let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
    let synced = results.len() - failed.len();
    if failed.is_empty() {
        println!("✓ Synced to {synced} client(s)");
    } else {
        println!("⚠ {} synced, {} failed", synced, failed.len());
        for result in failed {
            println!(
                "    {}: {}",
                result.client,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_env_pairs(pairs: &[String]) -> Result<EnvMap> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Invalid env pair '{}'. Use KEY=VALUE", pair))?;
            if key.is_empty() {
                anyhow::bail!("Invalid env pair '{}'. Use KEY=VALUE", pair);
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn unique(names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

fn state_dot(enabled: bool) -> console::StyledObject<&'static str> {
    if enabled {
        style("●").green()
    } else {
        style("●").dim()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
