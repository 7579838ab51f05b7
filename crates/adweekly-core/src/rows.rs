//! Raw rows as delivered by the ad-platform fetch adapter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One campaign's counters for one day. Unique by `(campaign_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRow {
    pub campaign_id: String,
    pub campaign_name: String,
    pub date: NaiveDate,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

/// Demographic axis a breakdown row belongs to.
///
/// Ordering is the display order of the report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Age,
    Gender,
    Region,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Age, Dimension::Gender, Dimension::Region];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Age => "age",
            Dimension::Gender => "gender",
            Dimension::Region => "region",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "age" => Ok(Dimension::Age),
            "gender" => Ok(Dimension::Gender),
            "region" => Ok(Dimension::Region),
            other => Err(CoreError::UnknownDimension(other.to_string())),
        }
    }
}

/// Counters for one bucket of one demographic dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    pub dimension: Dimension,
    pub bucket: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
}
