//! Combined report
//!
//! Aggregates one run's Daily and Weekly records into `report_<date>.json`:
//! relation counts, records grouped by day and by ISO week, and the date
//! range each export covers.

use crate::domain::{DailyLogRecord, RelationField, WeeklyLogRecord};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// File label of the combined report
pub const REPORT_LABEL: &str = "report";

/// Root of `report_<date>.json`
#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport<'a> {
    pub daily_logs: DailyReport<'a>,
    pub weekly_logs: WeeklyReport<'a>,
    pub report_metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub report_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyReport<'a> {
    pub summary: DailySummary,
    pub by_date: Vec<DateGroup<'a>>,
    /// Unique references per relation field, sorted
    pub relationships: BTreeMap<&'static str, Vec<String>>,
    pub metadata: RangeMetadata<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub total_entries: usize,
    pub concepts_count: usize,
    pub strategies_count: usize,
    pub experiments_count: usize,
    pub insights_count: usize,
    pub codebase_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub entries: Vec<&'a DailyLogRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport<'a> {
    pub summaries: Vec<WeeklyText<'a>>,
    pub tasks: Vec<WeeklyText<'a>>,
    pub by_week: Vec<WeekGroup<'a>>,
    pub metadata: RangeMetadata<DateTime<Utc>>,
}

/// A summary or task text with the page it came from
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyText<'a> {
    pub id: &'a str,
    pub date: DateTime<Utc>,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekGroup<'a> {
    /// ISO week, `YYYY-Www`
    pub week: String,
    pub entries: Vec<&'a WeeklyLogRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeMetadata<T> {
    pub total_count: usize,
    pub date_range: DateRange<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

impl<T: Ord + Copy> DateRange<T> {
    fn of(values: impl Iterator<Item = T> + Clone) -> Self {
        Self {
            start: values.clone().min(),
            end: values.max(),
        }
    }
}

impl<'a> CombinedReport<'a> {
    /// Builds the report for one run
    pub fn build(
        daily: &'a [DailyLogRecord],
        weekly: &'a [WeeklyLogRecord],
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            daily_logs: daily_report(daily),
            weekly_logs: weekly_report(weekly),
            report_metadata: ReportMetadata {
                generated_at,
                report_type: "combined",
            },
        }
    }
}

fn daily_report(records: &[DailyLogRecord]) -> DailyReport<'_> {
    let mut summary = DailySummary {
        total_entries: records.len(),
        ..Default::default()
    };
    let mut unique: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

    for record in records {
        for field in RelationField::ALL {
            let refs = record.relation(field);
            let count = match field {
                RelationField::Concepts => &mut summary.concepts_count,
                RelationField::Strategies => &mut summary.strategies_count,
                RelationField::Experiments => &mut summary.experiments_count,
                RelationField::Insights => &mut summary.insights_count,
                RelationField::Codebase => &mut summary.codebase_count,
            };
            *count += refs.len();
            unique
                .entry(field.snake_name())
                .or_default()
                .extend(refs.iter().cloned());
        }
    }

    let mut groups: BTreeMap<NaiveDate, Vec<&DailyLogRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.date).or_default().push(record);
    }
    let by_date = groups
        .into_iter()
        .rev()
        .map(|(date, entries)| DateGroup {
            date,
            count: entries.len(),
            entries,
        })
        .collect();

    let relationships = RelationField::ALL
        .iter()
        .map(|field| {
            let refs = unique
                .remove(field.snake_name())
                .map(|set| set.into_iter().collect())
                .unwrap_or_default();
            (field.snake_name(), refs)
        })
        .collect();

    DailyReport {
        summary,
        by_date,
        relationships,
        metadata: RangeMetadata {
            total_count: records.len(),
            date_range: DateRange::of(records.iter().map(|r| r.date)),
        },
    }
}

fn weekly_report(records: &[WeeklyLogRecord]) -> WeeklyReport<'_> {
    let summaries = weekly_texts(records, |r| r.summary.as_deref());
    let tasks = weekly_texts(records, |r| r.tasks.as_deref());

    let mut groups: BTreeMap<String, Vec<&WeeklyLogRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(iso_week(record.date)).or_default().push(record);
    }
    let by_week = groups
        .into_iter()
        .rev()
        .map(|(week, entries)| WeekGroup {
            week,
            count: entries.len(),
            entries,
        })
        .collect();

    WeeklyReport {
        summaries,
        tasks,
        by_week,
        metadata: RangeMetadata {
            total_count: records.len(),
            date_range: DateRange::of(records.iter().map(|r| r.date)),
        },
    }
}

fn weekly_texts<'a>(
    records: &'a [WeeklyLogRecord],
    pick: fn(&WeeklyLogRecord) -> Option<&str>,
) -> Vec<WeeklyText<'a>> {
    let mut entries: Vec<WeeklyText<'a>> = records
        .iter()
        .filter_map(|r| {
            pick(r).map(|text| WeeklyText {
                id: r.meta.id.as_str(),
                date: r.date,
                text,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// ISO 8601 week key, e.g. `2024-W22`
pub fn iso_week(ts: DateTime<Utc>) -> String {
    let week = ts.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}
