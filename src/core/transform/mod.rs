//! Page to record transformation
//!
//! Converts Notion pages into typed export records. There is one conversion
//! function per record type; property names come from the configured schema
//! while output keys are fixed by the record types.
//!
//! - [`daily`] - Daily Log pages to [`crate::domain::DailyLogRecord`]
//! - [`weekly`] - Weekly Log pages to [`crate::domain::WeeklyLogRecord`]
//! - [`relations`] - optional replacement of relation ids with page titles

pub mod daily;
pub mod relations;
pub mod weekly;

pub use daily::{to_daily_record, to_daily_records};
pub use relations::{complete_truncated_relations, resolve_relation_titles};
pub use weekly::{to_weekly_record, to_weekly_records};

use crate::adapters::notion::Page;
use crate::domain::PageMetadata;

/// Records converted from one query result
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed<T> {
    /// Successfully converted records, in query order
    pub records: Vec<T>,

    /// Pages dropped because required properties were missing
    pub skipped: usize,
}

impl<T> Transformed<T> {
    fn collect<F>(pages: &[Page], convert: F) -> Self
    where
        F: Fn(&Page) -> Option<T>,
    {
        let records: Vec<T> = pages.iter().filter_map(convert).collect();
        let skipped = pages.len() - records.len();
        Self { records, skipped }
    }
}

/// Page-level metadata of a Notion page
pub(crate) fn page_metadata(page: &Page) -> PageMetadata {
    PageMetadata {
        id: page.id.clone(),
        url: page.url.clone(),
        created_time: page.created_time,
        last_edited_time: page.last_edited_time,
    }
}

/// Trimmed text, `None` when blank
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
