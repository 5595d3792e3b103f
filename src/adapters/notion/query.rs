//! Database query construction
//!
//! Builds the `filter` and `sorts` objects of a Notion database query. The
//! collector only needs date lower bounds and single-key descending sorts,
//! so the model stays that small.

use crate::config::{DailyLogSchema, WeeklyLogSchema};
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Query filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// A date-typed property on or after `date`
    DateOnOrAfter { property: String, date: NaiveDate },

    /// Page creation timestamp on or after `date`
    CreatedOnOrAfter { date: NaiveDate },
}

impl Filter {
    /// Notion JSON representation
    pub fn to_json(&self) -> Value {
        match self {
            Filter::DateOnOrAfter { property, date } => json!({
                "property": property,
                "date": { "on_or_after": date.format("%Y-%m-%d").to_string() }
            }),
            Filter::CreatedOnOrAfter { date } => json!({
                "timestamp": "created_time",
                "created_time": { "on_or_after": date.format("%Y-%m-%d").to_string() }
            }),
        }
    }
}

/// Query sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
    Property {
        property: String,
        direction: SortDirection,
    },
    CreatedTime {
        direction: SortDirection,
    },
}

impl Sort {
    /// Notion JSON representation
    pub fn to_json(&self) -> Value {
        match self {
            Sort::Property {
                property,
                direction,
            } => json!({ "property": property, "direction": direction.as_str() }),
            Sort::CreatedTime { direction } => {
                json!({ "timestamp": "created_time", "direction": direction.as_str() })
            }
        }
    }
}

/// Filter and ordering of one database query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseQuery {
    pub filter: Option<Filter>,
    pub sorts: Vec<Sort>,
}

impl DatabaseQuery {
    /// Daily Log pages dated within the lookback window, newest first
    pub fn daily(schema: &DailyLogSchema, run_date: NaiveDate) -> Self {
        let since = run_date - Duration::days(i64::from(schema.lookback_days));
        Self {
            filter: Some(Filter::DateOnOrAfter {
                property: schema.date_property.clone(),
                date: since,
            }),
            sorts: vec![Sort::Property {
                property: schema.date_property.clone(),
                direction: SortDirection::Descending,
            }],
        }
    }

    /// Weekly Log pages created within the lookback window, newest first
    pub fn weekly(schema: &WeeklyLogSchema, run_date: NaiveDate) -> Self {
        let since = run_date - Duration::weeks(i64::from(schema.lookback_weeks));
        Self {
            filter: Some(Filter::CreatedOnOrAfter { date: since }),
            sorts: vec![Sort::CreatedTime {
                direction: SortDirection::Descending,
            }],
        }
    }

    pub fn filter_json(&self) -> Option<Value> {
        self.filter.as_ref().map(Filter::to_json)
    }

    pub fn sorts_json(&self) -> Vec<Value> {
        self.sorts.iter().map(Sort::to_json).collect()
    }
}
