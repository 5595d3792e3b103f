//! Exported record models
//!
//! Typed snapshots of Daily Log and Weekly Log pages. The serialized form of
//! each record is exactly one object in the corresponding export file; page
//! metadata rides along for logging and the combined report but is never
//! written into the per-type export.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which export a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Daily Log database
    Daily,
    /// Weekly Log database
    Weekly,
}

impl RecordKind {
    /// File name label (`daily` / `weekly`)
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Daily => "daily",
            RecordKind::Weekly => "weekly",
        }
    }

    /// Human readable database name
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordKind::Daily => "Daily Log",
            RecordKind::Weekly => "Weekly Log",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Page-level metadata common to every Notion page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page id as returned by the API (hyphenated)
    pub id: String,

    /// Public page URL
    pub url: Option<String>,

    /// Page creation timestamp
    pub created_time: Option<DateTime<Utc>>,

    /// Last edit timestamp
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// Relation properties carried by a Daily Log page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationField {
    Concepts,
    Strategies,
    Experiments,
    Insights,
    Codebase,
}

impl RelationField {
    /// All relation fields in export order
    pub const ALL: [RelationField; 5] = [
        RelationField::Concepts,
        RelationField::Strategies,
        RelationField::Experiments,
        RelationField::Insights,
        RelationField::Codebase,
    ];

    /// Output key, also the default Notion property name
    pub fn key(&self) -> &'static str {
        match self {
            RelationField::Concepts => "Concepts",
            RelationField::Strategies => "Strategies",
            RelationField::Experiments => "Experiments",
            RelationField::Insights => "Insights",
            RelationField::Codebase => "Codebase",
        }
    }

    /// Lowercase name used in report keys
    pub fn snake_name(&self) -> &'static str {
        match self {
            RelationField::Concepts => "concepts",
            RelationField::Strategies => "strategies",
            RelationField::Experiments => "experiments",
            RelationField::Insights => "insights",
            RelationField::Codebase => "codebase",
        }
    }
}

/// One Daily Log page
///
/// # Examples
///
/// ```
/// use notion_collector::domain::records::{DailyLogRecord, RelationField};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
/// let record = DailyLogRecord::new("Study systems design", date)
///     .with_relation(RelationField::Concepts, vec!["Caching".to_string()]);
///
/// let json = serde_json::to_string(&record).unwrap();
/// assert!(json.starts_with(r#"{"Name":"Study systems design","Date":"2024-06-02","Concepts":["Caching"]"#));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Concepts", default)]
    pub concepts: Vec<String>,

    #[serde(rename = "Strategies", default)]
    pub strategies: Vec<String>,

    #[serde(rename = "Experiments", default)]
    pub experiments: Vec<String>,

    #[serde(rename = "Insights", default)]
    pub insights: Vec<String>,

    #[serde(rename = "Codebase", default)]
    pub codebase: Vec<String>,

    #[serde(skip)]
    pub meta: PageMetadata,
}

impl DailyLogRecord {
    /// Creates a record with empty relations
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            concepts: Vec::new(),
            strategies: Vec::new(),
            experiments: Vec::new(),
            insights: Vec::new(),
            codebase: Vec::new(),
            meta: PageMetadata::default(),
        }
    }

    /// Sets the references of one relation field
    pub fn with_relation(mut self, field: RelationField, refs: Vec<String>) -> Self {
        *self.relation_mut(field) = refs;
        self
    }

    /// Sets the page metadata
    pub fn with_meta(mut self, meta: PageMetadata) -> Self {
        self.meta = meta;
        self
    }

    pub fn relation(&self, field: RelationField) -> &[String] {
        match field {
            RelationField::Concepts => &self.concepts,
            RelationField::Strategies => &self.strategies,
            RelationField::Experiments => &self.experiments,
            RelationField::Insights => &self.insights,
            RelationField::Codebase => &self.codebase,
        }
    }

    pub fn relation_mut(&mut self, field: RelationField) -> &mut Vec<String> {
        match field {
            RelationField::Concepts => &mut self.concepts,
            RelationField::Strategies => &mut self.strategies,
            RelationField::Experiments => &mut self.experiments,
            RelationField::Insights => &mut self.insights,
            RelationField::Codebase => &mut self.codebase,
        }
    }
}

/// One Weekly Log page
///
/// Missing summary or task text serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyLogRecord {
    /// Summary of the previous week (the page title)
    #[serde(rename = "上周总结")]
    pub summary: Option<String>,

    /// Tasks planned for the current week
    #[serde(rename = "本周任务")]
    pub tasks: Option<String>,

    /// Creation timestamp
    #[serde(rename = "Date")]
    pub date: DateTime<Utc>,

    #[serde(skip)]
    pub meta: PageMetadata,
}

impl WeeklyLogRecord {
    /// Creates a record
    pub fn new(summary: Option<String>, tasks: Option<String>, date: DateTime<Utc>) -> Self {
        Self {
            summary,
            tasks,
            date,
            meta: PageMetadata::default(),
        }
    }

    /// Sets the page metadata
    pub fn with_meta(mut self, meta: PageMetadata) -> Self {
        self.meta = meta;
        self
    }
}
