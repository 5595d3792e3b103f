//! Export command implementation
//!
//! This module implements the `export` command, which is also what runs when
//! the binary is invoked without a subcommand.

use crate::config::load_validated_config_with;
use crate::core::export::ExportCoordinator;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Run date used for file names and lookback windows (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write the combined report_<date>.json
    #[arg(long)]
    pub report: bool,

    /// Stop at the first failed export
    #[arg(long)]
    pub fail_fast: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        self.execute_with_env(config_path, |key| std::env::var(key).ok())
            .await
    }

    /// Execute the export command, reading environment variables through `lookup`
    pub(crate) async fn execute_with_env<F>(
        &self,
        config_path: &str,
        lookup: F,
    ) -> anyhow::Result<i32>
    where
        F: Fn(&str) -> Option<String>,
    {
        tracing::info!("Starting export command");

        let mut config = match load_validated_config_with(config_path, lookup) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        if let Some(dir) = &self.output_dir {
            tracing::info!(output_dir = %dir.display(), "Overriding output directory from CLI");
            config.export.output_dir = dir.clone();
        }
        if self.report {
            config.export.write_report = true;
        }
        if self.fail_fast {
            config.export.fail_fast = true;
        }

        let run_date = self.date.unwrap_or_else(|| Local::now().date_naive());

        let coordinator = match ExportCoordinator::from_config(config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("❌ Failed to initialize export: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("🚀 Exporting Notion databases for {run_date}...");
        println!();

        let summary = match coordinator.execute_export(run_date).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(e.exit_code());
            }
        };
        summary.log_summary();

        println!("📊 Export Summary:");
        for outcome in &summary.outcomes {
            println!(
                "  {}: {} records ({} skipped) -> {}",
                outcome.kind.display_name(),
                outcome.count,
                outcome.skipped,
                outcome.path.display()
            );
        }
        if let Some(path) = &summary.report_path {
            println!("  Report: {}", path.display());
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        if !summary.errors.is_empty() {
            eprintln!("⚠️  Errors encountered:");
            for error in &summary.errors {
                let label = error.kind.map(|k| k.display_name()).unwrap_or("Run");
                eprintln!("  - {label} ({:?}): {}", error.error_type, error.message);
            }
            eprintln!();
        }

        let exit_code = summary.exit_code();
        match exit_code {
            0 => println!("✅ Export completed successfully!"),
            1 => println!("⚠️  Export completed with failures"),
            _ => println!("❌ Export failed"),
        }

        Ok(exit_code)
    }
}
