//! Domain identifier types with validation
//!
//! Notion identifies databases and pages by a 128-bit id that shows up in
//! several shapes: hyphenated UUID form from the API, 32 hex digits in page
//! URLs, or a whole share link. The newtypes here accept any of those and keep
//! the canonical 32-digit lowercase form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_LEN: usize = 32;

/// Normalizes a Notion id, link or hyphenated UUID to 32 lowercase hex digits
fn normalize_notion_id(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Notion id cannot be empty".to_string());
    }

    // Share links: keep the last path segment, drop the query string
    let segment = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(trimmed);

    // Counted in chars: title slugs in share links may be non-ASCII
    let compact: Vec<char> = segment.chars().filter(|c| *c != '-').collect();
    if compact.len() < ID_LEN {
        return Err(format!(
            "Invalid Notion id '{raw}': expected 32 hex digits"
        ));
    }

    let candidate: String = compact[compact.len() - ID_LEN..].iter().collect();
    if !candidate.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!(
            "Invalid Notion id '{raw}': expected 32 hex digits"
        ));
    }

    Ok(candidate.to_ascii_lowercase())
}

/// Database identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use notion_collector::domain::ids::DatabaseId;
/// use std::str::FromStr;
///
/// let id = DatabaseId::from_str("1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d").unwrap();
/// assert_eq!(id.as_str(), "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseId(String);

impl DatabaseId {
    /// Creates a new DatabaseId, normalizing hyphens and share links away
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        normalize_notion_id(id.as_ref()).map(Self)
    }

    /// Returns the database id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatabaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DatabaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Page identifier newtype wrapper
///
/// Relation properties reference linked pages by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(String);

impl PageId {
    /// Creates a new PageId, normalizing hyphens away
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        normalize_notion_id(id.as_ref()).map(Self)
    }

    /// Returns the page id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
