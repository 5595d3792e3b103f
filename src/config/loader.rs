//! Configuration loader with optional TOML file and environment overrides
//!
//! Precedence, lowest first: built-in defaults, the TOML file (if present),
//! then environment variables. A `.env` file is loaded into the environment by
//! the binary before this runs.

use super::schema::{
    CollectorConfig, ENV_DAILY_LOG_DATABASE_ID, ENV_NOTION_TOKEN, ENV_OUTPUT_DIR,
    ENV_WEEKLY_LOG_DATABASE_ID,
};
use super::secret::secret_string;
use crate::domain::errors::CollectorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Prefix for `NOTION_COLLECTOR_<SECTION>_<KEY>` overrides
pub const ENV_PREFIX: &str = "NOTION_COLLECTOR_";

/// Loads and validates configuration from the process environment
///
/// The TOML file at `path` is optional; a missing file means "defaults plus
/// environment".
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, a
/// `${VAR}` placeholder is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use notion_collector::config::load_config;
///
/// let config = load_config("notion-collector.toml").expect("Failed to load config");
/// println!("Writing to {}", config.export.output_dir.display());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CollectorConfig> {
    load_validated_config_with(path, |key| std::env::var(key).ok())
}

/// Loads and validates configuration using `lookup` for environment variables
pub fn load_validated_config_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<CollectorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config_with(path, lookup)?;

    config.validate().map_err(|e| {
        CollectorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration from the process environment without validating it
///
/// Used by commands that only need optional settings (output directory,
/// logging) and must work before credentials are set up.
pub fn load_config_unvalidated(path: impl AsRef<Path>) -> Result<CollectorConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Loads configuration using `lookup` for environment variables, without validating
pub fn load_config_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<CollectorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();

    let mut config = if path.exists() {
        let contents = fs::read_to_string(path).map_err(|e| {
            CollectorError::Configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let contents = substitute_env_vars(&contents, &lookup)?;

        toml::from_str(&contents)
            .map_err(|e| CollectorError::Configuration(format!("Failed to parse TOML: {e}")))?
    } else {
        tracing::debug!(
            path = %path.display(),
            "Configuration file not found, using defaults and environment"
        );
        CollectorConfig::default()
    };

    apply_env_overrides(&mut config, &lookup);

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = placeholder_regex();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match lookup(var_name) {
                Some(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CollectorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// The four well-known variables (`NOTION_TOKEN`, the two database ids and
/// `OUTPUT_DIR`) are read unprefixed. Everything else follows
/// `NOTION_COLLECTOR_<SECTION>_<KEY>`. Empty values are ignored, and values
/// that fail to parse keep the previous setting.
fn apply_env_overrides<F>(config: &mut CollectorConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let prefixed = |key: &str| get(&format!("{ENV_PREFIX}{key}"));

    // Well-known variables
    if let Some(val) = get(ENV_NOTION_TOKEN) {
        config.notion.token = Some(secret_string(val.trim().to_string()));
    }
    if let Some(val) = get(ENV_DAILY_LOG_DATABASE_ID) {
        config.notion.daily_log_database_id = Some(val.trim().to_string());
    }
    if let Some(val) = get(ENV_WEEKLY_LOG_DATABASE_ID) {
        config.notion.weekly_log_database_id = Some(val.trim().to_string());
    }
    if let Some(val) = get(ENV_OUTPUT_DIR) {
        config.export.output_dir = PathBuf::from(val);
    }

    // Application
    if let Some(val) = prefixed("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }

    // Notion
    if let Some(val) = prefixed("NOTION_BASE_URL") {
        config.notion.base_url = val;
    }
    if let Some(val) = prefixed("NOTION_VERSION") {
        config.notion.notion_version = val;
    }
    if let Some(Ok(secs)) = prefixed("NOTION_TIMEOUT_SECONDS").map(|v| v.parse::<u64>()) {
        config.notion.timeout_seconds = secs;
    }
    if let Some(Ok(size)) = prefixed("NOTION_PAGE_SIZE").map(|v| v.parse::<u32>()) {
        config.notion.page_size = size;
    }

    // Lookback windows
    if let Some(Ok(days)) = prefixed("DAILY_LOOKBACK_DAYS").map(|v| v.parse::<u32>()) {
        config.daily.lookback_days = days;
    }
    if let Some(Ok(weeks)) = prefixed("WEEKLY_LOOKBACK_WEEKS").map(|v| v.parse::<u32>()) {
        config.weekly.lookback_weeks = weeks;
    }

    // Export
    if let Some(Ok(flag)) = prefixed("EXPORT_RESOLVE_RELATION_TITLES").map(|v| v.parse::<bool>()) {
        config.export.resolve_relation_titles = flag;
    }
    if let Some(Ok(flag)) = prefixed("EXPORT_WRITE_REPORT").map(|v| v.parse::<bool>()) {
        config.export.write_report = flag;
    }
    if let Some(Ok(flag)) = prefixed("EXPORT_FAIL_FAST").map(|v| v.parse::<bool>()) {
        config.export.fail_fast = flag;
    }

    // Logging
    if let Some(Ok(flag)) = prefixed("LOGGING_LOCAL_ENABLED").map(|v| v.parse::<bool>()) {
        config.logging.local_enabled = flag;
    }
    if let Some(val) = prefixed("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = prefixed("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
