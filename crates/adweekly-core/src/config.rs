use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_META_API_VERSION: &str = "v21.0";
const DEFAULT_META_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let meta_access_token = require("META_ACCESS_TOKEN")?;
    let meta_ad_account_id = require("META_AD_ACCOUNT_ID")?;
    let notion_token = require("NOTION_TOKEN")?;
    let notion_database_id = require("NOTION_DATABASE_ID")?;

    let env = parse_environment(&or_default("ADWEEKLY_ENV", "development"));
    let log_level = or_default("ADWEEKLY_LOG_LEVEL", "info");

    let meta_api_version = or_default("META_API_VERSION", DEFAULT_META_API_VERSION);
    if !meta_api_version.starts_with('v') {
        return Err(ConfigError::InvalidEnvVar {
            var: "META_API_VERSION".to_string(),
            reason: format!("expected a version like {DEFAULT_META_API_VERSION}, got '{meta_api_version}'"),
        });
    }
    let meta_graph_base_url = or_default("META_GRAPH_BASE_URL", DEFAULT_META_GRAPH_BASE_URL);
    let notion_base_url = or_default("NOTION_BASE_URL", DEFAULT_NOTION_BASE_URL);
    let notion_parent_page_id = optional("NOTION_PARENT_PAGE_ID");
    let slack_webhook_url = optional("SLACK_WEBHOOK_URL");

    let http_timeout_secs = parse_u64("ADWEEKLY_HTTP_TIMEOUT_SECS", "30")?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADWEEKLY_HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let max_retries = parse_u32("ADWEEKLY_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("ADWEEKLY_RETRY_BACKOFF_BASE_MS", "1000")?;
    let settings_path = optional("ADWEEKLY_SETTINGS_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        meta_access_token,
        meta_ad_account_id,
        meta_api_version,
        meta_graph_base_url,
        notion_token,
        notion_database_id,
        notion_parent_page_id,
        notion_base_url,
        slack_webhook_url,
        http_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        settings_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
