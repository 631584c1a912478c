//! Command dispatch: loads settings and runs one subcommand.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{run_demo, ApplicationError, Client};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{ComponentArena, ToTermTree, TreeBuilder};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Commands that never read settings run even with a broken config file
    match &cli.command {
        Some(Commands::Completion { shell }) => return cmd_completion(*shell),
        Some(Commands::Config {
            command: ConfigCommands::Path,
        }) => return cmd_config_path(),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);

    match &cli.command {
        None | Some(Commands::Demo) => cmd_demo(&settings),
        Some(Commands::Render { expr }) => cmd_render(&settings, expr),
        Some(Commands::Attach { tree, child }) => cmd_attach(&settings, tree, child),
        Some(Commands::Tree { expr }) => cmd_tree(&settings, expr),
        Some(Commands::Config { command }) => cmd_config(&settings, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_demo(settings: &Settings) -> CliResult<()> {
    run_demo(settings, io::stdout().lock())?;
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_render(settings: &Settings, expr: &str) -> CliResult<()> {
    let mut arena = ComponentArena::new();
    let root = TreeBuilder::new(settings.labels.clone()).build(&mut arena, expr)?;
    Client::new(settings, io::stdout().lock()).code_client_simple(&arena, root)?;
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_attach(settings: &Settings, tree: &str, child: &str) -> CliResult<()> {
    let mut arena = ComponentArena::new();
    let builder = TreeBuilder::new(settings.labels.clone());
    let root = builder.build(&mut arena, tree)?;
    let child = builder.build(&mut arena, child)?;
    Client::new(settings, io::stdout().lock()).code_client_managing(&mut arena, root, child)?;
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_tree(settings: &Settings, expr: &str) -> CliResult<()> {
    let mut arena = ComponentArena::new();
    let root = TreeBuilder::new(settings.labels.clone()).build(&mut arena, expr)?;

    output::info(&arena.to_term_tree(root, &settings.labels)?);
    output::action("depth", &arena.depth(root)?);
    output::action("leaves", &arena.leaf_count(root)?);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => return cmd_config_path(),
    }
    Ok(())
}

fn cmd_config_path() -> CliResult<()> {
    let path = global_config_path().ok_or_else(|| ApplicationError::Config {
        message: "no home directory, global config unavailable".into(),
    })?;
    output::info(&path.display());
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
