//! Presentation settings for the rendered report document.
//!
//! Loaded from an optional YAML file; every field has a default so a missing
//! path yields the stock layout.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rows::Dimension;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Campaign rows shown in the campaign table.
    pub campaign_limit: usize,
    /// Buckets shown per audience section. A dimension without an entry shows
    /// every bucket.
    pub audience_limits: BTreeMap<Dimension, usize>,
    /// Currency code printed after money amounts.
    pub currency: String,
    /// Display labels for gender buckets reported by the ad platform.
    pub gender_labels: BTreeMap<String, String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        let audience_limits = BTreeMap::from([(Dimension::Age, 5), (Dimension::Region, 5)]);
        let gender_labels = BTreeMap::from([
            ("male".to_string(), "Male".to_string()),
            ("female".to_string(), "Female".to_string()),
            ("unknown".to_string(), "Unclassified".to_string()),
        ]);
        Self {
            campaign_limit: 10,
            audience_limits,
            currency: "KRW".to_string(),
            gender_labels,
        }
    }
}

impl ReportSettings {
    /// Bucket limit for `dimension`, `None` meaning unlimited.
    #[must_use]
    pub fn audience_limit(&self, dimension: Dimension) -> Option<usize> {
        self.audience_limits.get(&dimension).copied()
    }

    /// Display label for a bucket, translating gender codes.
    #[must_use]
    pub fn bucket_label<'a>(&'a self, dimension: Dimension, bucket: &'a str) -> &'a str {
        match dimension {
            Dimension::Gender => self
                .gender_labels
                .get(bucket)
                .map_or(bucket, String::as_str),
            Dimension::Age | Dimension::Region => bucket,
        }
    }
}

/// Load report settings, falling back to defaults when `path` is `None`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_report_settings(path: Option<&Path>) -> Result<ReportSettings, ConfigError> {
    let Some(path) = path else {
        return Ok(ReportSettings::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings = parse_report_settings(&content)?;
    Ok(settings)
}

fn parse_report_settings(content: &str) -> Result<ReportSettings, ConfigError> {
    let settings: ReportSettings = serde_yaml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &ReportSettings) -> Result<(), ConfigError> {
    if settings.campaign_limit == 0 {
        return Err(ConfigError::Validation(
            "campaign_limit must be greater than zero".to_string(),
        ));
    }

    for (dimension, limit) in &settings.audience_limits {
        if *limit == 0 {
            return Err(ConfigError::Validation(format!(
                "audience limit for '{dimension}' must be greater than zero"
            )));
        }
    }

    if settings.currency.trim().is_empty() {
        return Err(ConfigError::Validation(
            "currency must be non-empty".to_string(),
        ));
    }

    Ok(())
}
