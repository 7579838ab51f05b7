//! Wire types for Graph API insights responses.

use serde::Deserialize;

/// One page of an insights edge.
#[derive(Debug, Deserialize)]
pub struct InsightsPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    /// Absolute URL of the next page; absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

/// Numeric fields arrive as decimal strings, occasionally as JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Text(String),
    Number(f64),
}

/// Entry of the `actions` / `action_values` arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionStat {
    pub action_type: String,
    pub value: NumericField,
}

/// Campaign-level row with `time_increment=1`.
#[derive(Debug, Deserialize)]
pub struct CampaignInsight {
    pub campaign_id: String,
    #[serde(default)]
    pub campaign_name: String,
    pub date_start: String,
    #[serde(default)]
    pub spend: Option<NumericField>,
    #[serde(default)]
    pub impressions: Option<NumericField>,
    #[serde(default)]
    pub clicks: Option<NumericField>,
    #[serde(default)]
    pub actions: Vec<ActionStat>,
    #[serde(default)]
    pub action_values: Vec<ActionStat>,
}

/// Account-level row split by one breakdown. Only the requested breakdown
/// key is populated.
#[derive(Debug, Deserialize)]
pub struct BreakdownInsight {
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub spend: Option<NumericField>,
    #[serde(default)]
    pub impressions: Option<NumericField>,
    #[serde(default)]
    pub clicks: Option<NumericField>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}
