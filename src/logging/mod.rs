//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - human readable console output on stderr
//! - optional JSON log files with rotation
//! - level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use notion_collector::logging::init_logging;
//! use notion_collector::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(label = "daily", "Export started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of one export
///
/// # Example
///
/// ```no_run
/// use notion_collector::log_export_start;
/// use notion_collector::domain::{DatabaseId, RecordKind};
///
/// let database_id = DatabaseId::new("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d").unwrap();
/// log_export_start!(RecordKind::Daily, &database_id);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($kind:expr, $database_id:expr) => {
        tracing::info!(
            label = %$kind,
            database_id = %$database_id,
            "Starting export"
        );
    };
}

/// Log the completion of one export
///
/// # Example
///
/// ```no_run
/// use notion_collector::log_export_complete;
/// use notion_collector::domain::RecordKind;
/// use std::path::Path;
///
/// log_export_complete!(RecordKind::Weekly, 4, Path::new("output/weekly_2024-06-02.json"));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($kind:expr, $count:expr, $path:expr) => {
        tracing::info!(
            label = %$kind,
            count = $count,
            path = %$path.display(),
            "Export completed"
        );
    };
}

/// Log an error with context
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
