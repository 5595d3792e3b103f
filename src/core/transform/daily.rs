//! Daily Log conversion

use super::{non_blank, page_metadata, Transformed};
use crate::adapters::notion::{Page, PropertyValue};
use crate::config::DailyLogSchema;
use crate::domain::{DailyLogRecord, RelationField};
use chrono::{DateTime, NaiveDate};

/// Converts one Daily Log page
///
/// Returns `None` (and logs a warning) when the page has no title text or no
/// parseable date. Missing relation properties become empty arrays.
///
/// # Examples
///
/// ```
/// use notion_collector::adapters::notion::Page;
/// use notion_collector::config::DailyLogSchema;
/// use notion_collector::core::transform::to_daily_record;
/// use serde_json::json;
///
/// let page: Page = serde_json::from_value(json!({
///     "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
///     "properties": {
///         "Name": {"type": "title", "title": [{"plain_text": "Study systems design"}]},
///         "Date": {"type": "date", "date": {"start": "2024-06-02"}},
///         "Concepts": {"type": "relation", "relation": [{"id": "c1"}]}
///     }
/// })).unwrap();
///
/// let record = to_daily_record(&page, &DailyLogSchema::default()).unwrap();
/// assert_eq!(record.name, "Study systems design");
/// assert_eq!(record.concepts, vec!["c1".to_string()]);
/// assert!(record.codebase.is_empty());
/// ```
pub fn to_daily_record(page: &Page, schema: &DailyLogSchema) -> Option<DailyLogRecord> {
    let name = non_blank(
        page.property(&schema.name_property)
            .and_then(PropertyValue::as_plain_text),
    );
    let Some(name) = name else {
        tracing::warn!(
            page_id = %page.id,
            property = %schema.name_property,
            "Skipping Daily Log page without a title"
        );
        return None;
    };

    let date = page.property(&schema.date_property).and_then(date_value);
    let Some(date) = date else {
        tracing::warn!(
            page_id = %page.id,
            property = %schema.date_property,
            "Skipping Daily Log page without a date"
        );
        return None;
    };

    let mut record = DailyLogRecord::new(name, date).with_meta(page_metadata(page));
    for field in RelationField::ALL {
        let property = schema.relation_property(field);
        if let Some(PropertyValue::Relation { has_more: true, .. }) = page.property(property) {
            tracing::warn!(
                page_id = %page.id,
                property = %property,
                "Relation could not be completed, export is truncated"
            );
        }
        let ids = page
            .property(property)
            .and_then(PropertyValue::relation_ids)
            .unwrap_or_default();
        *record.relation_mut(field) = ids;
    }

    Some(record)
}

/// Converts every page of a Daily Log query
pub fn to_daily_records(pages: &[Page], schema: &DailyLogSchema) -> Transformed<DailyLogRecord> {
    Transformed::collect(pages, |page| to_daily_record(page, schema))
}

fn date_value(value: &PropertyValue) -> Option<NaiveDate> {
    match value {
        PropertyValue::Date { date: Some(d) } => parse_date(&d.start),
        PropertyValue::CreatedTime {
            created_time: Some(ts),
        } => Some(ts.date_naive()),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 datetime (its local date is used)
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::fixtures::*;
    use test_case::test_case;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_daily_page() {
        let page = page(
            "59833787-2cf9-4fdf-8782-e53db20768a5",
            "2024-06-02T08:00:00.000Z",
            vec![
                ("Name", title("Study systems design")),
                ("Date", date("2024-06-02")),
                ("Concepts", relation(&["c1", "c2"])),
                ("Codebase", relation(&["repo"])),
                ("Strategies", relation(&[])),
            ],
        );

        let record = to_daily_record(&page, &DailyLogSchema::default()).unwrap();
        assert_eq!(record.name, "Study systems design");
        assert_eq!(record.date, ymd(2024, 6, 2));
        assert_eq!(record.concepts, vec!["c1", "c2"]);
        assert_eq!(record.codebase, vec!["repo"]);
        assert!(record.strategies.is_empty());
        assert!(record.experiments.is_empty());
        assert!(record.insights.is_empty());
        assert_eq!(record.meta.id, "59833787-2cf9-4fdf-8782-e53db20768a5");
    }

    #[test]
    fn test_missing_relations_serialize_as_empty_arrays() {
        let page = page(
            "p1",
            "2024-06-02T08:00:00.000Z",
            vec![("Name", title("Solo")), ("Date", date("2024-06-02"))],
        );
        let record = to_daily_record(&page, &DailyLogSchema::default()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        for field in RelationField::ALL {
            assert_eq!(json[field.key()], serde_json::json!([]));
        }
    }

    #[test]
    fn test_page_without_title_is_skipped() {
        let page = page(
            "p1",
            "2024-06-02T08:00:00.000Z",
            vec![("Name", title("   ")), ("Date", date("2024-06-02"))],
        );
        assert!(to_daily_record(&page, &DailyLogSchema::default()).is_none());
    }

    #[test]
    fn test_page_without_date_is_skipped() {
        let empty_date: serde_json::Value =
            serde_json::json!({"id": "d", "type": "date", "date": null});
        let page = page(
            "p1",
            "2024-06-02T08:00:00.000Z",
            vec![("Name", title("No date")), ("Date", empty_date)],
        );
        assert!(to_daily_record(&page, &DailyLogSchema::default()).is_none());
    }

    #[test]
    fn test_configured_property_names() {
        let schema = DailyLogSchema {
            name_property: "名称".to_string(),
            date_property: "Logdate".to_string(),
            ..Default::default()
        };
        let page = page(
            "p1",
            "2024-06-02T08:00:00.000Z",
            vec![("名称", title("读书")), ("Logdate", date("2024-06-01"))],
        );
        let record = to_daily_record(&page, &schema).unwrap();
        assert_eq!(record.name, "读书");
        assert_eq!(record.date, ymd(2024, 6, 1));
    }

    #[test]
    fn test_multi_segment_title_is_concatenated() {
        let title = serde_json::json!({
            "id": "title",
            "type": "title",
            "title": [{"plain_text": "Study "}, {"plain_text": "systems"}, {"plain_text": " design"}]
        });
        let page = page(
            "p1",
            "2024-06-02T08:00:00.000Z",
            vec![("Name", title), ("Date", date("2024-06-02"))],
        );
        let record = to_daily_record(&page, &DailyLogSchema::default()).unwrap();
        assert_eq!(record.name, "Study systems design");
    }

    #[test]
    fn test_to_daily_records_counts_skipped() {
        let pages = vec![
            page(
                "p1",
                "2024-06-02T08:00:00.000Z",
                vec![("Name", title("Kept")), ("Date", date("2024-06-02"))],
            ),
            page("p2", "2024-06-02T08:00:00.000Z", vec![("Name", title("No date"))]),
        ];
        let result = to_daily_records(&pages, &DailyLogSchema::default());
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test_case("2024-06-02", Some(ymd(2024, 6, 2)) ; "plain date")]
    #[test_case("2024-06-02T23:30:00.000+08:00", Some(ymd(2024, 6, 2)) ; "datetime keeps local date")]
    #[test_case("2024-06-02T10:00:00Z", Some(ymd(2024, 6, 2)) ; "utc datetime")]
    #[test_case("June 2nd", None ; "unparseable")]
    #[test_case("", None ; "empty")]
    fn test_parse_date(raw: &str, expected: Option<NaiveDate>) {
        assert_eq!(parse_date(raw), expected);
    }
}
