//! Init command implementation
//!
//! This module implements the `init` command, which writes a `.env` template
//! listing every environment variable the collector reads, and optionally a
//! sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Default name of the sample configuration file
const CONFIG_FILE_NAME: &str = "notion-collector.toml";

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Path of the environment file to create
    #[arg(short, long, default_value = ".env")]
    pub output: String,

    /// Also write a sample notion-collector.toml
    #[arg(long)]
    pub with_config: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing environment file");

        println!("📝 Initializing Notion Collector");
        println!();

        let mut targets = vec![(self.output.as_str(), Self::generate_env_template())];
        if self.with_config {
            targets.push((CONFIG_FILE_NAME, Self::generate_config_template()));
        }

        for (path, _) in &targets {
            if Path::new(path).exists() && !self.force {
                println!("❌ File already exists: {path}");
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        for (path, contents) in &targets {
            if let Err(e) = fs::write(path, contents) {
                println!("❌ Failed to write {path}");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Created {path}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Create an internal integration at https://www.notion.so/my-integrations");
        println!("  2. Share the Daily Log and Weekly Log databases with it");
        println!("  3. Fill in {}", self.output);
        println!("  4. Validate configuration: notion-collector validate-config");
        println!("  5. Run export: notion-collector");
        println!();
        Ok(0)
    }

    /// Environment file template
    fn generate_env_template() -> String {
        r#"# Notion Collector environment
# Never commit this file.

# Internal integration token (starts with ntn_ or secret_)
NOTION_TOKEN=

# Database ids: the 32 hex digits in the database URL, with or without hyphens
NOTION_DAILY_LOG_DATABASE_ID=
NOTION_WEEKLY_LOG_DATABASE_ID=

# Directory receiving daily_<date>.json and weekly_<date>.json (default: output)
# OUTPUT_DIR=output

# Optional overrides, NOTION_COLLECTOR_<SECTION>_<KEY>
# NOTION_COLLECTOR_APPLICATION_LOG_LEVEL=info
# NOTION_COLLECTOR_NOTION_TIMEOUT_SECONDS=30
# NOTION_COLLECTOR_DAILY_LOOKBACK_DAYS=7
# NOTION_COLLECTOR_WEEKLY_LOOKBACK_WEEKS=4
# NOTION_COLLECTOR_EXPORT_RESOLVE_RELATION_TITLES=false
# NOTION_COLLECTOR_EXPORT_WRITE_REPORT=false
# NOTION_COLLECTOR_EXPORT_FAIL_FAST=false
# NOTION_COLLECTOR_LOGGING_LOCAL_ENABLED=false
"#
        .to_string()
    }

    /// Sample configuration file with every section at its default
    fn generate_config_template() -> String {
        r#"# Notion Collector configuration
# Every setting is optional; environment variables take precedence.

[application]
log_level = "info"

[notion]
token = "${NOTION_TOKEN}"
base_url = "https://api.notion.com/v1"
notion_version = "2022-06-28"
timeout_seconds = 30
page_size = 100

[daily]
name_property = "Name"
date_property = "Date"
concepts_property = "Concepts"
strategies_property = "Strategies"
experiments_property = "Experiments"
insights_property = "Insights"
codebase_property = "Codebase"
lookback_days = 7

[weekly]
summary_property = "上周总结"
tasks_property = "本周任务"
date_property = "Date"
lookback_weeks = 4

[export]
output_dir = "output"
resolve_relation_titles = false
write_report = false
fail_fast = false

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
