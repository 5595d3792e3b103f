//! Export file writer
//!
//! Writes record lists to `<output_dir>/<label>_<YYYY-MM-DD>.json`. Files are
//! written to a temporary sibling first and renamed over the target, so a
//! rerun on the same day replaces the previous export in one step and a
//! failed write never leaves a truncated file behind.

use crate::domain::{CollectorError, RecordKind, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes export documents into one output directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl ExportWriter {
    /// Creates a writer for `output_dir`; the directory is created on first write
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Target path of the `label` export for `date`
    pub fn path_for(&self, label: &str, date: NaiveDate) -> PathBuf {
        self.output_dir
            .join(format!("{label}_{}.json", date.format("%Y-%m-%d")))
    }

    /// Writes `records` as one JSON array and returns the file path
    ///
    /// An empty slice writes `[]`.
    ///
    /// # Errors
    ///
    /// Returns `CollectorError::Write` if the directory cannot be created or
    /// the file cannot be written.
    ///
    /// # Examples
    ///
    /// ```
    /// use notion_collector::core::output::ExportWriter;
    /// use notion_collector::domain::{DailyLogRecord, RecordKind};
    /// use chrono::NaiveDate;
    ///
    /// # fn example() -> notion_collector::domain::Result<()> {
    /// let dir = std::env::temp_dir().join("notion-collector-doc");
    /// let writer = ExportWriter::new(&dir);
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    ///
    /// let records: Vec<DailyLogRecord> = Vec::new();
    /// let path = writer.write_export(RecordKind::Daily, date, &records)?;
    /// assert!(path.ends_with("daily_2024-06-02.json"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_export<T: Serialize>(
        &self,
        kind: RecordKind,
        date: NaiveDate,
        records: &[T],
    ) -> Result<PathBuf> {
        self.write_json(kind.label(), date, records)
    }

    /// Writes any serializable document under `label`
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        label: &str,
        date: NaiveDate,
        document: &T,
    ) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(document)?;
        let path = self.path_for(label, date);

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            CollectorError::Write(format!(
                "Cannot create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        write_atomically(&path, json.as_bytes())?;

        tracing::debug!(path = %path.display(), bytes = json.len(), "Export file written");
        Ok(path)
    }

    /// Every `*.json` file in the output directory, newest name first
    ///
    /// A missing directory yields an empty list.
    pub fn list_exports(&self) -> Result<Vec<PathBuf>> {
        if !self.output_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
            if path.is_file() && is_json {
                files.push(path);
            }
        }

        files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(files)
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CollectorError::Write(format!("Failed to write {}: {e}", path.display()))
    })
}
