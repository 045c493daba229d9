//! keepsake todo - persisted todo list

use clap::{Parser, Subcommand};
use keepsake_cli::{default_data_dir, render_todos, run, TodoCommand};
use keepsake_core::PersistSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keepsake-todo")]
#[command(about = "Todo list persisted with keepsake")]
#[command(version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory for persisted state
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Schema version to persist under
    #[arg(long)]
    schema_version: Option<String>,

    /// Log persistence diagnostics
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo
    Add {
        /// Title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Remove the todo at an index
    Remove {
        index: usize,
    },

    /// List todos
    List,

    /// Remove all todos
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let mut settings = match &cli.config {
        Some(path) => PersistSettings::load(path)?,
        None => PersistSettings {
            persist_directory: default_data_dir(),
            ..Default::default()
        },
    };
    if let Some(dir) = cli.data_dir {
        settings.persist_directory = dir;
    }
    if let Some(version) = cli.schema_version {
        settings.version = version;
    }
    settings.debug |= cli.debug;

    let command = match cli.command {
        Commands::Add { title, description } => TodoCommand::Add { title, description },
        Commands::Remove { index } => TodoCommand::Remove { index },
        Commands::List => TodoCommand::List,
        Commands::Clear => TodoCommand::Clear,
    };

    let state = run(&settings, command)?;
    println!("{}", render_todos(&state).trim_end());

    Ok(())
}
