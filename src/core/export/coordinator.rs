//! Export coordinator - main orchestrator for the export process
//!
//! One run exports the Daily Log, then the Weekly Log: each is fetched,
//! converted into records and written to its dated file. A file is only
//! written after its query succeeded, so an authentication failure leaves
//! the output directory untouched.

use crate::adapters::notion::{DatabaseQuery, NotionClient, NotionSource};
use crate::config::CollectorConfig;
use crate::core::export::summary::{ExportError, ExportOutcome, ExportSummary};
use crate::core::output::ExportWriter;
use crate::core::report::{CombinedReport, REPORT_LABEL};
use crate::core::transform::{
    complete_truncated_relations, resolve_relation_titles, to_daily_records, to_weekly_records,
};
use crate::domain::{
    CollectorError, DailyLogRecord, DatabaseId, RecordKind, Result, WeeklyLogRecord,
};
use crate::{log_export_complete, log_export_start};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
///
/// # Example
///
/// ```rust,no_run
/// use notion_collector::config::load_config;
/// use notion_collector::core::export::ExportCoordinator;
///
/// # async fn example() -> notion_collector::domain::Result<()> {
/// let config = load_config("notion-collector.toml")?;
/// let coordinator = ExportCoordinator::from_config(config)?;
///
/// let today = chrono::Local::now().date_naive();
/// let summary = coordinator.execute_export(today).await?;
/// println!("{} records written", summary.total_records());
/// # Ok(())
/// # }
/// ```
pub struct ExportCoordinator {
    config: CollectorConfig,
    source: Arc<dyn NotionSource>,
    writer: ExportWriter,
}

impl ExportCoordinator {
    /// Create a coordinator reading from `source`
    pub fn new(config: CollectorConfig, source: Arc<dyn NotionSource>) -> Self {
        let writer = ExportWriter::new(config.export.output_dir.clone());
        Self {
            config,
            source,
            writer,
        }
    }

    /// Create a coordinator backed by the Notion API
    pub fn from_config(config: CollectorConfig) -> Result<Self> {
        let client = NotionClient::new(&config.notion)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Execute the export for `run_date`
    ///
    /// Per-export failures are collected in the summary. Unless
    /// `export.fail_fast` is set, a failed Daily export does not prevent the
    /// Weekly export from running.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database ids in the configuration are
    /// invalid.
    pub async fn execute_export(&self, run_date: NaiveDate) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(run_date);

        let daily_id = self.config.notion.daily_database_id()?;
        let weekly_id = self.config.notion.weekly_database_id()?;

        tracing::info!(
            run_date = %run_date,
            output_dir = %self.writer.output_dir().display(),
            "Starting export run"
        );

        let daily = match self.export_daily(&daily_id, run_date).await {
            Ok((outcome, records)) => {
                summary.add_outcome(outcome);
                Some(records)
            }
            Err(e) => {
                record_failure(&mut summary, RecordKind::Daily, &e);
                if self.config.export.fail_fast {
                    return Ok(summary.with_duration(start_time.elapsed()));
                }
                None
            }
        };

        let weekly = match self.export_weekly(&weekly_id, run_date).await {
            Ok((outcome, records)) => {
                summary.add_outcome(outcome);
                Some(records)
            }
            Err(e) => {
                record_failure(&mut summary, RecordKind::Weekly, &e);
                None
            }
        };

        if self.config.export.write_report {
            match (daily, weekly) {
                (Some(daily), Some(weekly)) => {
                    let report = CombinedReport::build(&daily, &weekly, Utc::now());
                    match self.writer.write_json(REPORT_LABEL, run_date, &report) {
                        Ok(path) => {
                            tracing::info!(path = %path.display(), "Combined report written");
                            summary.report_path = Some(path);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to write combined report");
                            summary.add_error(ExportError::from(&e));
                        }
                    }
                }
                _ => tracing::warn!("Skipping combined report because an export failed"),
            }
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn export_daily(
        &self,
        database_id: &DatabaseId,
        run_date: NaiveDate,
    ) -> Result<(ExportOutcome, Vec<DailyLogRecord>)> {
        let kind = RecordKind::Daily;
        log_export_start!(kind, database_id);

        let query = DatabaseQuery::daily(&self.config.daily, run_date);
        let mut pages = self.source.query_database(database_id, &query).await?;
        tracing::debug!(label = %kind, pages = pages.len(), "Fetched pages");

        complete_truncated_relations(&mut pages, &self.config.daily, self.source.as_ref()).await?;
        let mut transformed = to_daily_records(&pages, &self.config.daily);
        if self.config.export.resolve_relation_titles {
            resolve_relation_titles(&mut transformed.records, self.source.as_ref()).await?;
        }

        let path = self
            .writer
            .write_export(kind, run_date, &transformed.records)?;
        log_export_complete!(kind, transformed.records.len(), path);

        let outcome = ExportOutcome {
            kind,
            count: transformed.records.len(),
            skipped: transformed.skipped,
            path,
        };
        Ok((outcome, transformed.records))
    }

    async fn export_weekly(
        &self,
        database_id: &DatabaseId,
        run_date: NaiveDate,
    ) -> Result<(ExportOutcome, Vec<WeeklyLogRecord>)> {
        let kind = RecordKind::Weekly;
        log_export_start!(kind, database_id);

        let query = DatabaseQuery::weekly(&self.config.weekly, run_date);
        let pages = self.source.query_database(database_id, &query).await?;
        tracing::debug!(label = %kind, pages = pages.len(), "Fetched pages");

        let transformed = to_weekly_records(&pages, &self.config.weekly);
        let path = self
            .writer
            .write_export(kind, run_date, &transformed.records)?;
        log_export_complete!(kind, transformed.records.len(), path);

        let outcome = ExportOutcome {
            kind,
            count: transformed.records.len(),
            skipped: transformed.skipped,
            path,
        };
        Ok((outcome, transformed.records))
    }
}

fn record_failure(summary: &mut ExportSummary, kind: RecordKind, error: &CollectorError) {
    tracing::error!(label = %kind, error = %error, "Export failed");
    summary.add_error(ExportError::from(error).for_kind(kind));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notion::Page;
    use crate::config::secret_string;
    use crate::core::export::summary::ExportErrorType;
    use crate::domain::{NotionError, PageId};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const DAILY_ID: &str = "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d";
    const WEEKLY_ID: &str = "6d5c4b3a2f1e0d9c8b7a6f5e4d3c2b1a";

    /// In-memory source keyed by database id
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<String, Vec<Page>>,
        failing: HashMap<String, fn() -> NotionError>,
        titles: HashMap<String, String>,
        relations: HashMap<String, Vec<String>>,
        queries: Mutex<Vec<(String, DatabaseQuery)>>,
    }

    #[async_trait]
    impl NotionSource for FakeSource {
        async fn query_database(
            &self,
            database_id: &DatabaseId,
            query: &DatabaseQuery,
        ) -> Result<Vec<Page>> {
            self.queries
                .lock()
                .unwrap()
                .push((database_id.to_string(), query.clone()));
            if let Some(make_err) = self.failing.get(database_id.as_str()) {
                return Err(make_err().into());
            }
            Ok(self
                .pages
                .get(database_id.as_str())
                .cloned()
                .unwrap_or_default())
        }

        async fn page_title(&self, page_id: &PageId) -> Result<Option<String>> {
            Ok(self.titles.get(page_id.as_str()).cloned())
        }

        async fn relation_ids(&self, page_id: &PageId, _: &str) -> Result<Vec<String>> {
            Ok(self
                .relations
                .get(page_id.as_str())
                .cloned()
                .unwrap_or_default())
        }
    }

    fn page(value: serde_json::Value) -> Page {
        serde_json::from_value(value).unwrap()
    }

    fn daily_page() -> Page {
        page(json!({
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "created_time": "2024-06-02T08:00:00.000Z",
            "properties": {
                "Name": {"type": "title", "title": [{"plain_text": "Study systems design"}]},
                "Date": {"type": "date", "date": {"start": "2024-06-02"}},
                "Concepts": {"type": "relation", "relation": [{"id": "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa"}]},
                "Codebase": {"type": "relation", "relation": [{"id": "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb"}]}
            }
        }))
    }

    fn weekly_page() -> Page {
        page(json!({
            "id": "w1",
            "created_time": "2024-06-02T01:00:00.000Z",
            "properties": {
                "上周总结": {"type": "title", "title": [{"plain_text": "Shipped caching"}]},
                "本周任务": {"type": "rich_text", "rich_text": [{"plain_text": "Write exporter"}]}
            }
        }))
    }

    fn config(output_dir: &std::path::Path) -> CollectorConfig {
        let mut config = CollectorConfig::default();
        config.notion.token = Some(secret_string("ntn_test".to_string()));
        config.notion.daily_log_database_id = Some(DAILY_ID.to_string());
        config.notion.weekly_log_database_id = Some(WEEKLY_ID.to_string());
        config.export.output_dir = output_dir.to_path_buf();
        config
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    }

    fn source_with_pages() -> FakeSource {
        let mut source = FakeSource::default();
        source.pages.insert(DAILY_ID.to_string(), vec![daily_page()]);
        source.pages.insert(WEEKLY_ID.to_string(), vec![weekly_page()]);
        source
    }

    #[tokio::test]
    async fn test_successful_run_writes_both_exports() {
        let dir = TempDir::new().unwrap();
        let source = Arc::new(source_with_pages());
        let coordinator = ExportCoordinator::new(config(dir.path()), source.clone());

        let summary = coordinator.execute_export(run_date()).await.unwrap();

        assert!(summary.is_successful());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.outcomes.len(), 2);
        assert!(dir.path().join("daily_2024-06-02.json").exists());
        assert!(dir.path().join("weekly_2024-06-02.json").exists());
        assert!(summary.report_path.is_none());

        let queries = source.queries.lock().unwrap();
        assert_eq!(queries[0].0, DAILY_ID);
        assert_eq!(queries[0].1, DatabaseQuery::daily(&Default::default(), run_date()));
        assert_eq!(queries[1].0, WEEKLY_ID);
    }

    #[tokio::test]
    async fn test_auth_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut source = FakeSource::default();
        source
            .failing
            .insert(DAILY_ID.to_string(), || NotionError::Auth("unauthorized".into()));
        source
            .failing
            .insert(WEEKLY_ID.to_string(), || NotionError::Auth("unauthorized".into()));
        let output = dir.path().join("output");
        let coordinator = ExportCoordinator::new(config(&output), Arc::new(source));

        let summary = coordinator.execute_export(run_date()).await.unwrap();

        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].error_type, ExportErrorType::Authentication);
        assert_eq!(summary.exit_code(), 3);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_daily_failure_still_runs_weekly() {
        let dir = TempDir::new().unwrap();
        let mut source = source_with_pages();
        source
            .failing
            .insert(DAILY_ID.to_string(), || NotionError::NotFound("db".into()));
        let coordinator = ExportCoordinator::new(config(dir.path()), Arc::new(source));

        let summary = coordinator.execute_export(run_date()).await.unwrap();

        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].kind, Some(RecordKind::Daily));
        assert!(summary.outcome(RecordKind::Weekly).is_some());
        assert!(!dir.path().join("daily_2024-06-02.json").exists());
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_after_first_failure() {
        let dir = TempDir::new().unwrap();
        let mut source = source_with_pages();
        source.failing.insert(DAILY_ID.to_string(), || {
            NotionError::TransientNetwork("timeout".into())
        });
        let source = Arc::new(source);
        let mut cfg = config(dir.path());
        cfg.export.fail_fast = true;
        let coordinator = ExportCoordinator::new(cfg, source.clone());

        let summary = coordinator.execute_export(run_date()).await.unwrap();

        assert_eq!(source.queries.lock().unwrap().len(), 1);
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_report_and_title_resolution() {
        let dir = TempDir::new().unwrap();
        let mut source = source_with_pages();
        source
            .titles
            .insert("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(), "Caching".to_string());
        source.titles.insert(
            "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            "notion-collector".to_string(),
        );
        let mut cfg = config(dir.path());
        cfg.export.resolve_relation_titles = true;
        cfg.export.write_report = true;
        let coordinator = ExportCoordinator::new(cfg, Arc::new(source));

        let summary = coordinator.execute_export(run_date()).await.unwrap();
        assert!(summary.is_successful(), "{:?}", summary.errors);

        let daily: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("daily_2024-06-02.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            daily,
            json!([{
                "Name": "Study systems design",
                "Date": "2024-06-02",
                "Concepts": ["Caching"],
                "Strategies": [],
                "Experiments": [],
                "Insights": [],
                "Codebase": ["notion-collector"]
            }])
        );

        let report_path = summary.report_path.unwrap();
        assert!(report_path.ends_with("report_2024-06-02.json"));
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["daily_logs"]["summary"]["concepts_count"], 1);
        assert_eq!(report["weekly_logs"]["summaries"][0]["text"], "Shipped caching");
    }

    #[tokio::test]
    async fn test_report_write_failure_is_recorded() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("report_2024-06-02.json")).unwrap();
        let mut cfg = config(dir.path());
        cfg.export.write_report = true;
        let coordinator = ExportCoordinator::new(cfg, Arc::new(source_with_pages()));

        let summary = coordinator.execute_export(run_date()).await.unwrap();

        assert_eq!(summary.outcomes.len(), 2);
        assert!(summary.report_path.is_none());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].error_type, ExportErrorType::Write);
        assert_eq!(summary.errors[0].kind, None);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_truncated_relation_completed_before_write() {
        let dir = TempDir::new().unwrap();
        let mut truncated = daily_page();
        truncated.properties.insert(
            "Concepts".to_string(),
            serde_json::from_value(json!({
                "id": "c%3Bx",
                "type": "relation",
                "relation": [{"id": "c1"}],
                "has_more": true
            }))
            .unwrap(),
        );
        let mut source = FakeSource::default();
        source.pages.insert(DAILY_ID.to_string(), vec![truncated]);
        source.relations.insert(
            "598337872cf94fdf8782e53db20768a5".to_string(),
            (1..=30).map(|n| format!("c{n}")).collect(),
        );
        let coordinator = ExportCoordinator::new(config(dir.path()), Arc::new(source));

        let summary = coordinator.execute_export(run_date()).await.unwrap();
        assert!(summary.is_successful(), "{:?}", summary.errors);

        let daily: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("daily_2024-06-02.json")).unwrap(),
        )
        .unwrap();
        let concepts = daily[0]["Concepts"].as_array().unwrap();
        assert_eq!(concepts.len(), 30);
        assert_eq!(concepts[29], "c30");
    }

    #[tokio::test]
    async fn test_invalid_database_id_is_error() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(dir.path());
        cfg.notion.daily_log_database_id = Some("nope".to_string());
        let coordinator = ExportCoordinator::new(cfg, Arc::new(FakeSource::default()));

        let err = coordinator.execute_export(run_date()).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
