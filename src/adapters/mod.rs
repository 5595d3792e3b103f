//! External system integrations.
//!
//! - [`notion`] - Notion REST API integration
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The export pipeline depends on the
//! [`notion::NotionSource`] trait rather than the HTTP client.
//!
//! ```rust,no_run
//! use notion_collector::adapters::notion::NotionClient;
//! use notion_collector::config::{secret_string, NotionConfig};
//!
//! # fn example() -> notion_collector::domain::Result<()> {
//! let config = NotionConfig {
//!     token: Some(secret_string("ntn_example".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = NotionClient::new(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod notion;
