//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap. Running the
//! binary without a subcommand performs one export cycle, which is what the
//! scheduled workflow does.

pub mod commands;

use clap::{Parser, Subcommand};

/// Notion Collector - weekly export of the Daily Log and Weekly Log databases
#[derive(Parser, Debug)]
#[command(name = "notion-collector")]
#[command(version, about, long_about = None)]
#[command(author = "Notion Collector Contributors")]
pub struct Cli {
    /// Path to the optional configuration file
    #[arg(
        short,
        long,
        default_value = "notion-collector.toml",
        env = "NOTION_COLLECTOR_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NOTION_COLLECTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `export`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Export both Notion databases to dated JSON files
    Export(commands::export::ExportArgs),

    /// Validate configuration and environment
    ValidateConfig(commands::validate::ValidateArgs),

    /// List existing export files
    Status(commands::status::StatusArgs),

    /// Write a .env template
    Init(commands::init::InitArgs),
}

impl Cli {
    /// The subcommand to run, `export` with default arguments when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Export(Default::default()))
    }
}
