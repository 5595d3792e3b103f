//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which checks the
//! configuration file and environment without contacting Notion.

use crate::config::load_config_unvalidated;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration ({config_path})");
        println!();

        let config = match load_config_unvalidated(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                let token = config
                    .notion
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().masked())
                    .unwrap_or_default();

                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Notion API: {}", config.notion.base_url);
                println!("  Notion Version: {}", config.notion.notion_version);
                println!("  Token: {token}");
                println!(
                    "  Daily Log Database: {}",
                    config.notion.daily_log_database_id.as_deref().unwrap_or("-")
                );
                println!(
                    "  Weekly Log Database: {}",
                    config.notion.weekly_log_database_id.as_deref().unwrap_or("-")
                );
                println!("  Daily Lookback: {} days", config.daily.lookback_days);
                println!("  Weekly Lookback: {} weeks", config.weekly.lookback_weeks);
                println!("  Output Directory: {}", config.export.output_dir.display());
                println!(
                    "  Resolve Relation Titles: {}",
                    config.export.resolve_relation_titles
                );
                println!("  Combined Report: {}", config.export.write_report);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}
