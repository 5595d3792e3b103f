// Notion Collector - weekly Notion database exporter
// Copyright (c) 2025 Notion Collector Contributors
// Licensed under the MIT License

//! # Notion Collector
//!
//! Notion Collector exports two Notion databases, the **Daily Log** and the
//! **Weekly Log**, to dated JSON files. It is meant to run once a week from a
//! scheduled CI workflow, but any run (including a manual one) is a complete,
//! idempotent export.
//!
//! ## Overview
//!
//! - **Fetch** pages from each database through the Notion REST API, filtered
//!   to a lookback window and sorted newest first
//! - **Transform** each page into a typed record with fixed output keys
//! - **Write** `output/daily_<date>.json` and `output/weekly_<date>.json`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export coordination, transformation, output files, report
//! - [`adapters`] - Notion API client
//! - [`domain`] - Records, ids and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notion_collector::config::load_config;
//! use notion_collector::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("notion-collector.toml")?;
//!     let coordinator = ExportCoordinator::from_config(config)?;
//!
//!     let summary = coordinator
//!         .execute_export(chrono::Local::now().date_naive())
//!         .await?;
//!
//!     println!("Exported {} records", summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::CollectorError`]; each variant maps to a
//! process exit code through [`domain::CollectorError::exit_code`].
//!
//! ```rust,no_run
//! use notion_collector::domain::CollectorError;
//!
//! fn example() -> Result<(), CollectorError> {
//!     let config = notion_collector::config::load_config("notion-collector.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
