//! Core business logic.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration and run summary
//! - [`transform`] - Notion pages to typed records
//! - [`output`] - Dated JSON export files
//! - [`report`] - Optional combined report
//!
//! # Export Workflow
//!
//! 1. **Query Notion**: Fetch Daily Log and Weekly Log pages in the lookback window
//! 2. **Transform**: Convert pages to records, skipping incomplete pages
//! 3. **Resolve** (optional): Replace relation ids with page titles
//! 4. **Write**: `output/daily_<date>.json` and `output/weekly_<date>.json`
//! 5. **Report** (optional): `output/report_<date>.json`
//!
//! # Example
//!
//! ```rust,no_run
//! use notion_collector::config::load_config;
//! use notion_collector::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("notion-collector.toml")?;
//! let coordinator = ExportCoordinator::from_config(config)?;
//!
//! let summary = coordinator
//!     .execute_export(chrono::Local::now().date_naive())
//!     .await?;
//!
//! println!("Records: {}", summary.total_records());
//! println!("Errors: {}", summary.errors.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod output;
pub mod report;
pub mod transform;
