//! Weekly Log conversion

use super::daily::parse_date;
use super::{non_blank, page_metadata, Transformed};
use crate::adapters::notion::{Page, PropertyValue};
use crate::config::WeeklyLogSchema;
use crate::domain::WeeklyLogRecord;
use chrono::{DateTime, TimeZone, Utc};

/// Converts one Weekly Log page
///
/// The page is skipped when it has neither a summary nor task text. Either
/// one on its own is enough; the missing one is exported as `null`.
pub fn to_weekly_record(page: &Page, schema: &WeeklyLogSchema) -> Option<WeeklyLogRecord> {
    let summary = non_blank(
        page.property(&schema.summary_property)
            .and_then(PropertyValue::as_plain_text),
    );
    let tasks = non_blank(
        page.property(&schema.tasks_property)
            .and_then(PropertyValue::as_plain_text),
    );

    if summary.is_none() && tasks.is_none() {
        tracing::warn!(page_id = %page.id, "Skipping Weekly Log page without summary or tasks");
        return None;
    }

    let date = page
        .property(&schema.date_property)
        .and_then(timestamp_value)
        .or(page.created_time);
    let Some(date) = date else {
        tracing::warn!(page_id = %page.id, "Skipping Weekly Log page without a creation time");
        return None;
    };

    Some(WeeklyLogRecord::new(summary, tasks, date).with_meta(page_metadata(page)))
}

/// Converts every page of a Weekly Log query
pub fn to_weekly_records(
    pages: &[Page],
    schema: &WeeklyLogSchema,
) -> Transformed<WeeklyLogRecord> {
    Transformed::collect(pages, |page| to_weekly_record(page, schema))
}

fn timestamp_value(value: &PropertyValue) -> Option<DateTime<Utc>> {
    match value {
        PropertyValue::CreatedTime { created_time } => *created_time,
        PropertyValue::Date { date: Some(d) } => DateTime::parse_from_rfc3339(d.start.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                parse_date(&d.start)
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        _ => None,
    }
}
