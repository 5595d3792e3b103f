//! Configuration schema types
//!
//! Every section has defaults so the collector runs from environment
//! variables alone; the TOML file only needs the settings it changes.

use crate::config::SecretString;
use crate::domain::{CollectorError, DatabaseId, RelationField, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Notion integration token
pub const ENV_NOTION_TOKEN: &str = "NOTION_TOKEN";

/// Environment variable holding the Daily Log database id
pub const ENV_DAILY_LOG_DATABASE_ID: &str = "NOTION_DAILY_LOG_DATABASE_ID";

/// Environment variable holding the Weekly Log database id
pub const ENV_WEEKLY_LOG_DATABASE_ID: &str = "NOTION_WEEKLY_LOG_DATABASE_ID";

/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";

/// Main collector configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Notion API connection
    #[serde(default)]
    pub notion: NotionConfig,

    /// Daily Log database property mapping
    #[serde(default)]
    pub daily: DailyLogSchema,

    /// Weekly Log database property mapping
    #[serde(default)]
    pub weekly: WeeklyLogSchema,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CollectorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid section. Missing
    /// required variables are all reported together.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.notion.validate()?;
        self.daily.validate()?;
        self.weekly.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Notion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token (`NOTION_TOKEN`)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Daily Log database id (`NOTION_DAILY_LOG_DATABASE_ID`)
    #[serde(default)]
    pub daily_log_database_id: Option<String>,

    /// Weekly Log database id (`NOTION_WEEKLY_LOG_DATABASE_ID`)
    #[serde(default)]
    pub weekly_log_database_id: Option<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Notion-Version` header
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Results per query page (Notion caps this at 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl NotionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        use secrecy::ExposeSecret;

        let token_missing = self
            .token
            .as_ref()
            .map(|t| t.expose_secret().is_empty())
            .unwrap_or(true);

        let mut missing = Vec::new();
        if token_missing {
            missing.push(ENV_NOTION_TOKEN);
        }
        if is_blank(&self.daily_log_database_id) {
            missing.push(ENV_DAILY_LOG_DATABASE_ID);
        }
        if is_blank(&self.weekly_log_database_id) {
            missing.push(ENV_WEEKLY_LOG_DATABASE_ID);
        }
        if !missing.is_empty() {
            return Err(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            ));
        }

        if let Some(ref id) = self.daily_log_database_id {
            DatabaseId::new(id).map_err(|e| format!("{ENV_DAILY_LOG_DATABASE_ID}: {e}"))?;
        }
        if let Some(ref id) = self.weekly_log_database_id {
            DatabaseId::new(id).map_err(|e| format!("{ENV_WEEKLY_LOG_DATABASE_ID}: {e}"))?;
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("notion.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("notion.base_url must start with http:// or https://".to_string());
        }

        if self.notion_version.trim().is_empty() {
            return Err("notion.notion_version cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("notion.timeout_seconds must be > 0".to_string());
        }

        if !(1..=100).contains(&self.page_size) {
            return Err(format!(
                "notion.page_size must be between 1 and 100, got {}",
                self.page_size
            ));
        }

        Ok(())
    }

    /// Parsed Daily Log database id
    pub fn daily_database_id(&self) -> Result<DatabaseId> {
        parse_database_id(&self.daily_log_database_id, ENV_DAILY_LOG_DATABASE_ID)
    }

    /// Parsed Weekly Log database id
    pub fn weekly_database_id(&self) -> Result<DatabaseId> {
        parse_database_id(&self.weekly_log_database_id, ENV_WEEKLY_LOG_DATABASE_ID)
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            daily_log_database_id: None,
            weekly_log_database_id: None,
            base_url: default_base_url(),
            notion_version: default_notion_version(),
            timeout_seconds: default_timeout_seconds(),
            page_size: default_page_size(),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}

fn parse_database_id(value: &Option<String>, var: &str) -> Result<DatabaseId> {
    let raw = value
        .as_deref()
        .ok_or_else(|| CollectorError::Configuration(format!("{var} is not set")))?;
    DatabaseId::new(raw).map_err(|e| CollectorError::Configuration(format!("{var}: {e}")))
}

/// Property names of the Daily Log database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLogSchema {
    /// Title property
    #[serde(default = "default_name_property")]
    pub name_property: String,

    /// Date property (also used for filtering and sorting)
    #[serde(default = "default_date_property")]
    pub date_property: String,

    #[serde(default = "default_concepts_property")]
    pub concepts_property: String,

    #[serde(default = "default_strategies_property")]
    pub strategies_property: String,

    #[serde(default = "default_experiments_property")]
    pub experiments_property: String,

    #[serde(default = "default_insights_property")]
    pub insights_property: String,

    #[serde(default = "default_codebase_property")]
    pub codebase_property: String,

    /// Export pages dated within this many days before the run date
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl DailyLogSchema {
    /// Notion property name backing a relation field
    pub fn relation_property(&self, field: RelationField) -> &str {
        match field {
            RelationField::Concepts => &self.concepts_property,
            RelationField::Strategies => &self.strategies_property,
            RelationField::Experiments => &self.experiments_property,
            RelationField::Insights => &self.insights_property,
            RelationField::Codebase => &self.codebase_property,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.name_property.trim().is_empty() || self.date_property.trim().is_empty() {
            return Err("daily.name_property and daily.date_property cannot be empty".to_string());
        }
        for field in RelationField::ALL {
            if self.relation_property(field).trim().is_empty() {
                return Err(format!(
                    "daily.{}_property cannot be empty",
                    field.snake_name()
                ));
            }
        }
        if !(1..=366).contains(&self.lookback_days) {
            return Err(format!(
                "daily.lookback_days must be between 1 and 366, got {}",
                self.lookback_days
            ));
        }
        Ok(())
    }
}

impl Default for DailyLogSchema {
    fn default() -> Self {
        Self {
            name_property: default_name_property(),
            date_property: default_date_property(),
            concepts_property: default_concepts_property(),
            strategies_property: default_strategies_property(),
            experiments_property: default_experiments_property(),
            insights_property: default_insights_property(),
            codebase_property: default_codebase_property(),
            lookback_days: default_lookback_days(),
        }
    }
}

/// Property names of the Weekly Log database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyLogSchema {
    /// Title property holding last week's summary
    #[serde(default = "default_summary_property")]
    pub summary_property: String,

    /// Text property holding this week's tasks
    #[serde(default = "default_tasks_property")]
    pub tasks_property: String,

    /// Created-time property
    #[serde(default = "default_date_property")]
    pub date_property: String,

    /// Export pages created within this many weeks before the run date
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: u32,
}

impl WeeklyLogSchema {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.summary_property.trim().is_empty()
            || self.tasks_property.trim().is_empty()
            || self.date_property.trim().is_empty()
        {
            return Err("weekly property names cannot be empty".to_string());
        }
        if !(1..=53).contains(&self.lookback_weeks) {
            return Err(format!(
                "weekly.lookback_weeks must be between 1 and 53, got {}",
                self.lookback_weeks
            ));
        }
        Ok(())
    }
}

impl Default for WeeklyLogSchema {
    fn default() -> Self {
        Self {
            summary_property: default_summary_property(),
            tasks_property: default_tasks_property(),
            date_property: default_date_property(),
            lookback_weeks: default_lookback_weeks(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the export files (`OUTPUT_DIR`)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Replace relation page ids with the linked pages' titles
    #[serde(default)]
    pub resolve_relation_titles: bool,

    /// Also write the combined `report_<date>.json`
    #[serde(default)]
    pub write_report: bool,

    /// Abort the run at the first failed export instead of attempting the other
    #[serde(default)]
    pub fail_fast: bool,
}

impl ExportConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.output_dir.as_os_str().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            resolve_relation_titles: false,
            write_report: false,
            fail_fast: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging next to console output
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_name_property() -> String {
    "Name".to_string()
}

fn default_date_property() -> String {
    "Date".to_string()
}

fn default_concepts_property() -> String {
    RelationField::Concepts.key().to_string()
}

fn default_strategies_property() -> String {
    RelationField::Strategies.key().to_string()
}

fn default_experiments_property() -> String {
    RelationField::Experiments.key().to_string()
}

fn default_insights_property() -> String {
    RelationField::Insights.key().to_string()
}

fn default_codebase_property() -> String {
    RelationField::Codebase.key().to_string()
}

fn default_lookback_days() -> u32 {
    7
}

fn default_summary_property() -> String {
    "上周总结".to_string()
}

fn default_tasks_property() -> String {
    "本周任务".to_string()
}

fn default_lookback_weeks() -> u32 {
    4
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
