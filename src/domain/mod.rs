//! Domain models and types for the collector.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DatabaseId`], [`PageId`])
//! - **Exported records** ([`DailyLogRecord`], [`WeeklyLogRecord`])
//! - **Error types** ([`CollectorError`], [`NotionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CollectorError>`]:
//!
//! ```rust
//! use notion_collector::domain::{DatabaseId, CollectorError, Result};
//!
//! fn example() -> Result<DatabaseId> {
//!     DatabaseId::new("1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d").map_err(CollectorError::Validation)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;

pub use errors::{CollectorError, NotionError};
pub use ids::{DatabaseId, PageId};
pub use records::{DailyLogRecord, PageMetadata, RecordKind, RelationField, WeeklyLogRecord};
pub use result::Result;
