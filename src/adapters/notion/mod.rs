//! Notion adapter implementation
//!
//! This module provides the integration with the Notion REST API: the
//! authenticated client, query construction, the wire models and the
//! [`NotionSource`] trait the export pipeline depends on.

pub mod client;
pub mod models;
pub mod query;
pub mod source;

pub use client::NotionClient;
pub use models::{Page, PropertyValue, QueryResponse};
pub use query::{DatabaseQuery, Filter, Sort, SortDirection};
pub use source::NotionSource;
