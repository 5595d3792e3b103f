//! Notion API models
//!
//! Request and response structures of the Notion REST API. These are kept
//! separate from the domain records: the loosely typed property bag of a page
//! is decoded into the tagged [`PropertyValue`] enum here, and the conversion
//! into typed records happens in `core::transform`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /databases/{id}/query`
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,

    pub page_size: u32,
}

/// One page of query results
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A Notion page (database row)
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// Looks up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Plain text of the page's title property, whatever it is named
    pub fn title(&self) -> Option<String> {
        self.properties.values().find_map(|value| match value {
            PropertyValue::Title { title } => Some(plain_text(title)),
            _ => None,
        })
    }
}

/// A typed page property value
///
/// Only the property types the collector reads are modelled; everything else
/// decodes to [`PropertyValue::Unsupported`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    /// Legacy name of `rich_text` still emitted by some older databases
    Text {
        #[serde(default)]
        text: Vec<RichText>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    CreatedTime {
        #[serde(default)]
        created_time: Option<DateTime<Utc>>,
    },
    Relation {
        /// Property id, needed to page through truncated relations
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        relation: Vec<RelationRef>,
        /// Notion inlines at most 25 references per relation
        #[serde(default)]
        has_more: bool,
    },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// Concatenated plain text of a title or text property
    pub fn as_plain_text(&self) -> Option<String> {
        match self {
            PropertyValue::Title { title } => Some(plain_text(title)),
            PropertyValue::RichText { rich_text } => Some(plain_text(rich_text)),
            PropertyValue::Text { text } => Some(plain_text(text)),
            _ => None,
        }
    }

    /// Page ids of a relation property, in Notion's order
    pub fn relation_ids(&self) -> Option<Vec<String>> {
        match self {
            PropertyValue::Relation { relation, .. } => {
                Some(relation.iter().map(|r| r.id.clone()).collect())
            }
            _ => None,
        }
    }
}

/// One rich text segment
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,

    #[serde(default)]
    pub href: Option<String>,
}

/// Value of a date property
#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    /// `YYYY-MM-DD` or an RFC 3339 datetime
    pub start: String,

    #[serde(default)]
    pub end: Option<String>,

    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Reference to a linked page
#[derive(Debug, Clone, Deserialize)]
pub struct RelationRef {
    pub id: String,
}

/// One page of `GET /pages/{id}/properties/{property_id}` for a relation
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyItemList {
    #[serde(default)]
    pub results: Vec<PropertyItem>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A single property item; only relation items carry a reference
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyItem {
    #[serde(default)]
    pub relation: Option<RelationRef>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,

    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub message: String,
}

/// Joins every segment's plain text
pub fn plain_text(segments: &[RichText]) -> String {
    segments.iter().map(|s| s.plain_text.as_str()).collect()
}
