//! Command-line interface module for fieldhist
//!
//! This module is organized into submodules:
//! - `args`: Command-line argument structures
//! - `handlers`: Command handler implementations

mod args;
mod handlers;

pub use args::*;
use handlers::*;

use crate::config::Config;
use crate::error::Result;
use crate::store::HistoryStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;

/// fieldhist - per-field input history merged into suggestion lists
#[derive(Parser)]
#[command(name = "fieldhist")]
#[command(about = "Per-field input history merged into suggestion lists")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// History database path (overrides the configuration)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remember a value for a field
    Add(AddArgs),
    /// List a field's history, most recent first
    List(ListArgs),
    /// Clear one field's history or all of it
    Clear(ClearArgs),
    /// Forget a single value
    Remove(RemoveArgs),
    /// List fields with stored history
    Tags,
    /// Show the suggestions a field would offer
    Suggest(SuggestArgs),
    /// Show history statistics
    Stats,
    /// Show configuration
    Config(ConfigArgs),
    /// Run an interactive history field in the terminal
    Demo(DemoArgs),
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub store: Rc<HistoryStore>,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = if let Some(config_path) = &cli.config {
            Config::load_from_path(config_path)?
        } else {
            Config::load().unwrap_or_else(|_| Config::default())
        };

        if let Some(database) = &cli.database {
            config.database_path = database.clone();
        }

        let store = Rc::new(crate::open_store(&config)?);

        Ok(Self {
            config,
            store,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Run the CLI application
    pub fn run(&mut self, command: &Commands) -> Result<()> {
        self.verbose_println(&format!(
            "Using history database {}",
            self.store.path().display()
        ));

        match command {
            Commands::Add(args) => handle_add(self, args),
            Commands::List(args) => handle_list(self, args),
            Commands::Clear(args) => handle_clear(self, args),
            Commands::Remove(args) => handle_remove(self, args),
            Commands::Tags => handle_tags(self),
            Commands::Suggest(args) => handle_suggest(self, args),
            Commands::Stats => handle_stats(self),
            Commands::Config(args) => handle_config(self, args),
            Commands::Demo(args) => handle_demo(self, args),
        }
    }

    pub fn verbose_println(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("[verbose] {}", message);
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut app = CliApp::new(&cli)?;
    app.run(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_suggest() {
        let cli = Cli::try_parse_from([
            "fieldhist", "suggest", "--tag", "country", "-i", "France", "-i", "Spain", "fr",
        ])
        .unwrap();

        match cli.command {
            Commands::Suggest(args) => {
                assert_eq!(args.tag, "country");
                assert_eq!(args.items, vec!["France", "Spain"]);
                assert_eq!(args.text, "fr");
            }
            _ => panic!("expected suggest"),
        }
    }

    #[test]
    fn test_database_override() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");
        let config = dir.path().join("absent.json");
        let cli = Cli::try_parse_from([
            "fieldhist",
            "--config",
            config.to_str().unwrap(),
            "--database",
            db.to_str().unwrap(),
            "tags",
        ])
        .unwrap();

        let mut app = CliApp::new(&cli).unwrap();
        assert_eq!(app.store.path(), db.as_path());
        app.run(&cli.command).unwrap();
    }
}
