//! Shared domain types and configuration for the weekly ad report.

pub mod app_config;
pub mod config;
pub mod rows;
pub mod settings;
pub mod window;

use chrono::NaiveDate;
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use rows::{DemographicRow, Dimension, InsightRow};
pub use settings::{load_report_settings, ReportSettings};
pub use window::ReportWindow;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("report window {start}..={end} must span exactly 7 days")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("unknown breakdown dimension: {0}")]
    UnknownDimension(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsFileParse(#[from] serde_yaml::Error),

    #[error("settings validation error: {0}")]
    Validation(String),
}
