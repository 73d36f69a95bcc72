//! Interactive prompts for the CLI.
//!
//! `add` collects a server definition through [`AddServerFlow`] when no
//! command is given on the command line. Uses dialoguer for terminal UI
//! prompts.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};

use mcpsync_core::commands::DiscoveredServer;
use mcpsync_core::config::{EnvMap, ServerDefinition};
use mcpsync_core::types::ClientId;

const DEFAULT_COMMAND: &str = "npx";

/// Values from CLI args that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledServer {
    /// Server command - if Some, skip command, args and env prompts
    pub command: Option<String>,
    /// Arguments given with `-a`
    pub args: Option<Vec<String>>,
    /// `KEY=VALUE` pairs given with `-e`, applied over prompted values
    pub env: EnvMap,
    /// Add the server disabled
    pub disabled: bool,
    /// Skip the final confirmation
    pub yes: bool,
}

/// Result of the add flow.
#[derive(Debug, Clone)]
pub struct AddServerResult {
    pub server: ServerDefinition,
    pub confirmed: bool,
}

/// Collects a server definition, prompting for whatever was not prefilled.
pub struct AddServerFlow<W: Write = io::Stdout> {
    name: String,
    prefilled: PrefilledServer,
    writer: W,
    theme: ColorfulTheme,
}

impl AddServerFlow<io::Stdout> {
    pub fn new(name: impl Into<String>, prefilled: PrefilledServer) -> Self {
        Self {
            name: name.into(),
            prefilled,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> AddServerFlow<W> {
    #[cfg(test)]
    pub fn with_writer(name: impl Into<String>, prefilled: PrefilledServer, writer: W) -> Self {
        Self {
            name: name.into(),
            prefilled,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Flow:
    /// 1. Command, arguments and env vars when no command was given
    /// 2. Env pairs from the command line override prompted ones
    /// 3. Summary and confirm
    pub fn collect(&mut self) -> Result<AddServerResult> {
        let (command, args, mut env) = match self.prefilled.command.clone() {
            Some(command) => (
                command,
                self.prefilled.args.clone().unwrap_or_default(),
                EnvMap::new(),
            ),
            None => {
                self.print_header()?;
                let command = self.prompt_command()?;
                let args = self.prompt_args()?;
                let env = self.prompt_env()?;
                (command, args, env)
            }
        };
        env.extend(self.prefilled.env.clone());

        let mut server = ServerDefinition::new(command)
            .with_args(args)
            .with_disabled(self.prefilled.disabled);
        for (key, value) in env {
            server = server.with_env(key, value);
        }

        let confirmed = self.show_summary_and_confirm(&server)?;
        Ok(AddServerResult { server, confirmed })
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            style(format!("  Add server '{}'", self.name)).bold().cyan()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn prompt_command(&self) -> Result<String> {
        let command: String = Input::with_theme(&self.theme)
            .with_prompt("Server command")
            .default(DEFAULT_COMMAND.to_string())
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Command is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        Ok(command.trim().to_string())
    }

    fn prompt_args(&self) -> Result<Vec<String>> {
        if let Some(args) = &self.prefilled.args {
            return Ok(args.clone());
        }

        let raw: String = Input::with_theme(&self.theme)
            .with_prompt("Server arguments (space-separated)")
            .allow_empty(true)
            .interact_text()?;
        Ok(split_args(&raw))
    }

    fn prompt_env(&self) -> Result<EnvMap> {
        let mut env = EnvMap::new();
        loop {
            let prompt = if env.is_empty() {
                "Add environment variables?"
            } else {
                "Add another env var?"
            };
            let more = Confirm::with_theme(&self.theme)
                .with_prompt(prompt)
                .default(false)
                .interact()?;
            if !more {
                return Ok(env);
            }

            let key: String = Input::with_theme(&self.theme)
                .with_prompt("Env var name")
                .interact_text()?;
            let value: String = Input::with_theme(&self.theme)
                .with_prompt(format!("Value for {key}"))
                .allow_empty(true)
                .interact_text()?;
            env.insert(key, value);
        }
    }

    fn show_summary_and_confirm(&mut self, server: &ServerDefinition) -> Result<bool> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        writeln!(self.writer, "  Name:     {}", style(&self.name).green())?;
        writeln!(self.writer, "  Command:  {}", style(&server.command).green())?;
        if !server.args.is_empty() {
            writeln!(self.writer, "  Args:     {}", style(server.args.join(" ")).green())?;
        }
        if !server.env.is_empty() {
            let keys: Vec<_> = server.env.keys().map(String::as_str).collect();
            writeln!(self.writer, "  Env:      {}", style(keys.join(", ")).green())?;
        }
        if server.disabled {
            writeln!(self.writer, "  State:    {}", style("disabled").yellow())?;
        }
        writeln!(self.writer)?;

        // Fully specified on the command line: nothing to review.
        if self.prefilled.yes || self.prefilled.command.is_some() {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Add this server?")
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Yes/no question defaulting to yes.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact()?)
}

/// Pick sync targets; every client starts selected.
pub fn prompt_clients() -> Result<Vec<ClientId>> {
    let names: Vec<_> = ClientId::ALL.iter().map(|id| id.display_name()).collect();
    let defaults = vec![true; names.len()];

    let selections = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Which clients should mcpsync sync to? (space to toggle, enter to confirm)")
        .items(&names)
        .defaults(&defaults)
        .interact()?;

    Ok(selections.into_iter().map(|i| ClientId::ALL[i]).collect())
}

/// Pick which discovered servers to import; every entry starts selected.
pub fn prompt_import_selection(discovered: &[DiscoveredServer]) -> Result<Vec<String>> {
    let items: Vec<_> = discovered
        .iter()
        .map(|d| format!("{} (from {})", d.name, d.source.display_name()))
        .collect();
    let defaults = vec![true; items.len()];

    let selections = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select servers to import")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    Ok(selections
        .into_iter()
        .map(|i| discovered[i].name.clone())
        .collect())
}
