//! Configuration management for the collector.
//!
//! Configuration is environment-first: the three required values come from
//! `NOTION_TOKEN`, `NOTION_DAILY_LOG_DATABASE_ID` and
//! `NOTION_WEEKLY_LOG_DATABASE_ID` (usually through a `.env` file). An optional
//! TOML file tunes everything else.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use notion_collector::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("notion-collector.toml")?;
//! println!("Notion API: {}", config.notion.base_url);
//! println!("Output: {}", config.export.output_dir.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`NotionConfig`] - token, database ids, API endpoint and timeouts
//! - [`DailyLogSchema`] / [`WeeklyLogSchema`] - property names and lookback windows
//! - [`ExportConfig`] - output directory and export behavior
//! - [`LoggingConfig`] - optional file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [notion]
//! token = "${NOTION_TOKEN}"
//! timeout_seconds = 30
//!
//! [daily]
//! name_property = "名称"
//! date_property = "Logdate"
//! lookback_days = 7
//!
//! [export]
//! output_dir = "output"
//! resolve_relation_titles = true
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{
    load_config, load_config_unvalidated, load_config_with, load_validated_config_with,
};
pub use schema::{
    ApplicationConfig, CollectorConfig, DailyLogSchema, ExportConfig, LoggingConfig,
    NotionConfig, WeeklyLogSchema,
};
pub use secret::{secret_string, SecretString, SecretValue};
