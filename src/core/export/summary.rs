//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::{CollectorError, NotionError, RecordKind};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

/// One export file written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Which database the file came from
    pub kind: RecordKind,

    /// Records written
    pub count: usize,

    /// Pages dropped for missing required properties
    pub skipped: usize,

    /// File path
    pub path: PathBuf,
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Date used in the file names
    pub run_date: NaiveDate,

    /// Exports written, in run order
    pub outcomes: Vec<ExportOutcome>,

    /// Combined report path, when one was written
    pub report_path: Option<PathBuf>,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(run_date: NaiveDate) -> Self {
        Self {
            run_date,
            outcomes: Vec::new(),
            report_path: None,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_outcome(&mut self, outcome: ExportOutcome) {
        self.outcomes.push(outcome);
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Outcome of one export, if it was written
    pub fn outcome(&self, kind: RecordKind) -> Option<&ExportOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }

    /// Total records written across exports
    pub fn total_records(&self) -> usize {
        self.outcomes.iter().map(|o| o.count).sum()
    }

    /// Check if the run was successful (no errors)
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit code for this run
    ///
    /// 0 when everything succeeded, 1 when some exports were written but
    /// others failed, and the code of the first error when nothing was written.
    pub fn exit_code(&self) -> i32 {
        match self.errors.first() {
            None => 0,
            Some(_) if !self.outcomes.is_empty() => 1,
            Some(first) => first.exit_code,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_date = %self.run_date,
            exports = self.outcomes.len(),
            records = self.total_records(),
            duration_ms = self.duration.as_millis() as u64,
            "Run completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Run completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    label = error.kind.map(|k| k.label()).unwrap_or("-"),
                    message = %error.message,
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Connection failure, timeout, rate limit or server error
    Connection,
    /// Token rejected or database not shared with the integration
    Authentication,
    /// Database missing or query rejected
    Query,
    /// Output file could not be written
    Write,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

impl ExportErrorType {
    fn of(error: &CollectorError) -> Self {
        match error {
            CollectorError::Configuration(_) | CollectorError::Validation(_) => Self::Configuration,
            CollectorError::Notion(NotionError::Auth(_)) => Self::Authentication,
            CollectorError::Notion(e) if e.is_transient() => Self::Connection,
            CollectorError::Notion(_) => Self::Query,
            CollectorError::Write(_) | CollectorError::Io(_) => Self::Write,
            _ => Self::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Export the error belongs to, `None` for run-level errors
    pub kind: Option<RecordKind>,

    /// Error message
    pub message: String,

    /// Exit code of the underlying error
    pub exit_code: i32,
}

impl ExportError {
    /// Attach the export the error belongs to
    pub fn for_kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl From<&CollectorError> for ExportError {
    fn from(error: &CollectorError) -> Self {
        Self {
            error_type: ExportErrorType::of(error),
            kind: None,
            message: error.to_string(),
            exit_code: error.exit_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    }

    fn outcome(kind: RecordKind, count: usize) -> ExportOutcome {
        ExportOutcome {
            kind,
            count,
            skipped: 0,
            path: PathBuf::from(format!("output/{}_2024-06-02.json", kind.label())),
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(date());

        assert_eq!(summary.run_date, date());
        assert!(summary.outcomes.is_empty());
        assert!(summary.errors.is_empty());
        assert!(summary.report_path.is_none());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.is_successful());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(date()).with_duration(Duration::from_secs(3));
        assert_eq!(summary.duration, Duration::from_secs(3));
    }

    #[test]
    fn test_totals_and_lookup() {
        let mut summary = ExportSummary::new(date());
        summary.add_outcome(outcome(RecordKind::Daily, 5));
        summary.add_outcome(outcome(RecordKind::Weekly, 2));

        assert_eq!(summary.total_records(), 7);
        assert_eq!(summary.outcome(RecordKind::Weekly).map(|o| o.count), Some(2));
    }

    #[test]
    fn test_partial_failure_exits_one() {
        let mut summary = ExportSummary::new(date());
        summary.add_outcome(outcome(RecordKind::Daily, 5));
        let err = CollectorError::from(NotionError::NotFound("weekly".to_string()));
        summary.add_error(ExportError::from(&err).for_kind(RecordKind::Weekly));

        assert!(!summary.is_successful());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_total_failure_uses_error_code() {
        let mut summary = ExportSummary::new(date());
        let err = CollectorError::from(NotionError::Auth("unauthorized".to_string()));
        summary.add_error(ExportError::from(&err).for_kind(RecordKind::Daily));

        assert_eq!(summary.errors[0].error_type, ExportErrorType::Authentication);
        assert_eq!(summary.exit_code(), 3);
    }

    #[test]
    fn test_error_classification() {
        let cases = [
            (
                CollectorError::Notion(NotionError::TransientNetwork("reset".into())),
                ExportErrorType::Connection,
            ),
            (
                CollectorError::Notion(NotionError::NotFound("db".into())),
                ExportErrorType::Query,
            ),
            (CollectorError::Write("disk full".into()), ExportErrorType::Write),
            (
                CollectorError::Configuration("missing".into()),
                ExportErrorType::Configuration,
            ),
            (CollectorError::Other("?".into()), ExportErrorType::Unknown),
        ];
        for (err, expected) in cases {
            assert_eq!(ExportError::from(&err).error_type, expected, "{err}");
        }
    }

    #[test]
    fn test_export_error_keeps_message_and_code() {
        let err = CollectorError::Write("disk full".to_string());
        let error = ExportError::from(&err).for_kind(RecordKind::Daily);

        assert_eq!(error.error_type, ExportErrorType::Write);
        assert_eq!(error.kind, Some(RecordKind::Daily));
        assert_eq!(error.message, "Write error: disk full");
        assert_eq!(error.exit_code, 5);
    }
}
