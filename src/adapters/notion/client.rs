//! Notion REST client
//!
//! A thin reqwest wrapper around the two endpoints the collector uses:
//! database queries and page retrieval. Every call is a single attempt;
//! failures are classified into [`NotionError`] and returned to the caller.

use super::models::{ErrorBody, Page, PropertyItemList, QueryRequest, QueryResponse};
use super::query::DatabaseQuery;
use super::source::NotionSource;
use crate::config::NotionConfig;
use crate::domain::ids::{DatabaseId, PageId};
use crate::domain::{CollectorError, NotionError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the pinned API version
const NOTION_VERSION_HEADER: &str = "notion-version";

/// Authenticated Notion API client
///
/// # Example
///
/// ```no_run
/// use notion_collector::adapters::notion::{DatabaseQuery, NotionClient, NotionSource};
/// use notion_collector::config::load_config;
///
/// # async fn example() -> notion_collector::domain::Result<()> {
/// let config = load_config("notion-collector.toml")?;
/// let client = NotionClient::new(&config.notion)?;
///
/// let database_id = config.notion.daily_database_id()?;
/// let pages = client
///     .query_database(&database_id, &DatabaseQuery::default())
///     .await?;
/// println!("{} pages", pages.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl NotionClient {
    /// Builds the HTTP client with the bearer token, API version and timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is missing or is not a
    /// valid header value, or if the HTTP client cannot be built.
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let token = config
            .token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| CollectorError::Configuration("NOTION_TOKEN is not set".to_string()))?;

        let raw_token: &str = token.expose_secret().as_ref();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", raw_token.trim()))
            .map_err(|_| {
                CollectorError::Configuration(
                    "NOTION_TOKEN contains characters not allowed in an HTTP header".to_string(),
                )
            })?;
        auth_value.set_sensitive(true);

        let version_value = HeaderValue::from_str(&config.notion_version).map_err(|_| {
            CollectorError::Configuration(format!(
                "Invalid notion_version '{}'",
                config.notion_version
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(NOTION_VERSION_HEADER, version_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                CollectorError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// Retrieves a single page
    pub async fn retrieve_page(&self, page_id: &PageId) -> Result<Page> {
        let url = format!("{}/pages/{}", self.base_url, page_id);
        tracing::debug!(page_id = %page_id, "Retrieving Notion page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        decode(response).await
    }

    /// Title of a single page
    pub async fn retrieve_page_title(&self, page_id: &PageId) -> Result<Option<String>> {
        Ok(self.retrieve_page(page_id).await?.title())
    }

    /// Every page id referenced by a relation property, following pagination
    pub async fn retrieve_relation_ids(
        &self,
        page_id: &PageId,
        property_id: &str,
    ) -> Result<Vec<String>> {
        let url = format!("{}/pages/{}/properties/{}", self.base_url, page_id, property_id);
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("page_size", self.page_size.to_string())]);
            if let Some(start) = cursor.take() {
                request = request.query(&[("start_cursor", start)]);
            }

            let response = request.send().await.map_err(|e| transport_error(&url, e))?;
            let list: PropertyItemList = decode(response).await?;
            ids.extend(
                list.results
                    .into_iter()
                    .filter_map(|item| item.relation.map(|r| r.id)),
            );

            match (list.has_more, list.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(
            page_id = %page_id,
            property_id = %property_id,
            references = ids.len(),
            "Relation property retrieved"
        );
        Ok(ids)
    }

    async fn query_page(
        &self,
        database_id: &DatabaseId,
        query: &DatabaseQuery,
        start_cursor: Option<String>,
    ) -> Result<QueryResponse> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        let body = QueryRequest {
            filter: query.filter_json(),
            sorts: query.sorts_json(),
            start_cursor,
            page_size: self.page_size,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        decode(response).await
    }
}

#[async_trait]
impl NotionSource for NotionClient {
    async fn query_database(
        &self,
        database_id: &DatabaseId,
        query: &DatabaseQuery,
    ) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;
        let mut requests = 0u32;

        loop {
            let response = self.query_page(database_id, query, cursor.take()).await?;
            requests += 1;
            pages.extend(response.results);

            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                (true, None) => {
                    tracing::warn!(
                        database_id = %database_id,
                        "Notion reported more results without a cursor, stopping pagination"
                    );
                    break;
                }
                (false, _) => break,
            }
        }

        tracing::debug!(
            database_id = %database_id,
            pages = pages.len(),
            requests = requests,
            "Database query complete"
        );

        Ok(pages)
    }

    async fn page_title(&self, page_id: &PageId) -> Result<Option<String>> {
        self.retrieve_page_title(page_id).await
    }

    async fn relation_ids(&self, page_id: &PageId, property_id: &str) -> Result<Vec<String>> {
        self.retrieve_relation_ids(page_id, property_id).await
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> CollectorError {
    let message = if err.is_timeout() {
        format!("Request to {url} timed out")
    } else {
        format!("Request to {url} failed: {err}")
    };
    NotionError::TransientNetwork(message).into()
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.text().await.map_err(|e| {
        CollectorError::from(NotionError::TransientNetwork(format!(
            "Failed to read response body: {e}"
        )))
    })?;

    if !status.is_success() {
        return Err(classify_error(status, retry_after, &body).into());
    }

    serde_json::from_str(&body).map_err(|e| NotionError::InvalidResponse(e.to_string()).into())
}

/// Maps a non-2xx response to a [`NotionError`]
///
/// The `code` and `message` of Notion's error body are kept in the message;
/// a body that is not a Notion error object is used verbatim.
pub(crate) fn classify_error(
    status: StatusCode,
    retry_after: Option<String>,
    body: &str,
) -> NotionError {
    let (code, message) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => (err.code, err.message),
        Err(_) => (String::new(), body.trim().to_string()),
    };
    let detail = if code.is_empty() {
        message.clone()
    } else {
        format!("{code}: {message}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NotionError::Auth(detail),
        StatusCode::NOT_FOUND => NotionError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => NotionError::RateLimited(format!(
            "{} seconds ({detail})",
            retry_after.as_deref().unwrap_or("unknown")
        )),
        s if s.is_server_error() => NotionError::Server {
            status: s.as_u16(),
            message: detail,
        },
        s => NotionError::Client {
            status: s.as_u16(),
            code,
            message,
        },
    }
}
