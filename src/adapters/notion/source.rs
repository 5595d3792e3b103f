//! Notion data source trait
//!
//! The export coordinator talks to Notion through [`NotionSource`] so it can be
//! driven by an in-memory source in tests.

use super::models::Page;
use super::query::DatabaseQuery;
use crate::domain::ids::{DatabaseId, PageId};
use crate::domain::Result;
use async_trait::async_trait;

/// Read access to Notion databases and pages
#[async_trait]
pub trait NotionSource: Send + Sync {
    /// Returns every page of `database_id` matching `query`, following
    /// pagination until the result set is exhausted
    ///
    /// # Errors
    ///
    /// Returns a `NotionError` wrapped in `CollectorError::Notion` on
    /// authentication failure, unknown database, network failure or an
    /// unexpected response.
    async fn query_database(
        &self,
        database_id: &DatabaseId,
        query: &DatabaseQuery,
    ) -> Result<Vec<Page>>;

    /// Plain-text title of a single page, `None` if the page has no title
    async fn page_title(&self, page_id: &PageId) -> Result<Option<String>>;

    /// Every page id referenced by one relation property of a page
    ///
    /// Used when a query result reports `has_more` for a relation, since
    /// query results only inline the first references.
    async fn relation_ids(&self, page_id: &PageId, property_id: &str) -> Result<Vec<String>>;
}
