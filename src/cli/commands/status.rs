//! Status command implementation
//!
//! This module implements the `status` command, which lists the export files
//! already present in the output directory.

use crate::config::load_config_with;
use crate::core::output::ExportWriter;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the status command
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Show at most this many files
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        self.execute_with_env(config_path, |key| std::env::var(key).ok())
            .await
    }

    /// Execute the status command, reading environment variables through `lookup`
    pub(crate) async fn execute_with_env<F>(
        &self,
        config_path: &str,
        lookup: F,
    ) -> anyhow::Result<i32>
    where
        F: Fn(&str) -> Option<String>,
    {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let config = match load_config_with(config_path, lookup) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let writer = ExportWriter::new(config.export.output_dir);
        let files = match writer.list_exports() {
            Ok(f) => f,
            Err(e) => {
                println!("❌ Failed to read output directory");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("Output directory: {}", writer.output_dir().display());
        println!();

        if files.is_empty() {
            println!("No exports found.");
            println!("Run 'notion-collector export' to create the first one.");
            return Ok(0);
        }

        for entry in export_entries(&files, self.limit) {
            match entry.records {
                Some(count) => println!("  {}  {count} records  {} bytes", entry.name, entry.bytes),
                None => println!("  {}  {} bytes", entry.name, entry.bytes),
            }
        }
        if files.len() > self.limit {
            println!("  ... and {} more", files.len() - self.limit);
        }
        println!();

        Ok(0)
    }
}

/// One line of the status listing
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExportEntry {
    name: String,
    records: Option<usize>,
    bytes: u64,
}

fn export_entries(files: &[PathBuf], limit: usize) -> Vec<ExportEntry> {
    files
        .iter()
        .take(limit)
        .map(|path| ExportEntry {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            records: record_count(path),
            bytes: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        })
        .collect()
}

/// Number of records in an export array, `None` for other documents
fn record_count(path: &Path) -> Option<usize> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<serde_json::Value>(&contents).ok()? {
        serde_json::Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_count() {
        let dir = TempDir::new().unwrap();
        let export = dir.path().join("daily_2024-06-02.json");
        fs::write(&export, r#"[{"Name":"a"},{"Name":"b"}]"#).unwrap();
        let report = dir.path().join("report_2024-06-02.json");
        fs::write(&report, r#"{"report_metadata":{}}"#).unwrap();

        assert_eq!(record_count(&export), Some(2));
        assert_eq!(record_count(&report), None);
        assert_eq!(record_count(&dir.path().join("missing.json")), None);
    }

    #[test]
    fn test_export_entries_respect_limit() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("daily_2024-06-02.json"), "[{},{},{}]").unwrap();
        fs::write(dir.path().join("weekly_2024-06-02.json"), "[]").unwrap();
        let writer = ExportWriter::new(dir.path());
        let files = writer.list_exports().unwrap();

        let entries = export_entries(&files, 1);
        assert_eq!(
            entries,
            vec![ExportEntry {
                name: "weekly_2024-06-02.json".to_string(),
                records: Some(0),
                bytes: 2,
            }]
        );
        assert_eq!(export_entries(&files, 20)[1].records, Some(3));
    }

    #[tokio::test]
    async fn test_status_reads_injected_output_dir() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("daily_2024-06-02.json"), "[]").unwrap();
        let output_str = output.display().to_string();

        let code = StatusArgs { limit: 20 }
            .execute_with_env(
                dir.path().join("missing.toml").to_str().unwrap(),
                |key: &str| (key == "OUTPUT_DIR").then(|| output_str.clone()),
            )
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_status_unreadable_output_dir_exits_five() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("output");
        fs::write(&blocker, "not a directory").unwrap();
        let blocker_str = blocker.display().to_string();

        let code = StatusArgs { limit: 20 }
            .execute_with_env(
                dir.path().join("missing.toml").to_str().unwrap(),
                |key: &str| (key == "OUTPUT_DIR").then(|| blocker_str.clone()),
            )
            .await
            .unwrap();
        assert_eq!(code, 5);
    }
}
