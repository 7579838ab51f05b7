use adweekly_core::Dimension;
use chrono::NaiveDate;
use serde::Serialize;

use crate::metrics::{DerivedMetrics, RawCounters};

/// Weekly totals and derived metrics for one campaign, or for the whole
/// account when `campaign_id` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub counters: RawCounters,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceBucket {
    pub bucket: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub share_of_impressions: f64,
    /// `None` when the dimension recorded no spend at all.
    pub share_of_spend: Option<f64>,
    pub ctr: Option<f64>,
}

/// Buckets of one dimension ranked by impressions, shares relative to the
/// dimension's own totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceBreakdown {
    pub dimension: Dimension,
    pub buckets: Vec<AudienceBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Complete,
    InProgress,
    NeedsReview,
}

impl ReportStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Complete => "complete",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::NeedsReview => "needs_review",
        }
    }

    /// Label used for the status select option in the document store.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Complete => "Complete",
            ReportStatus::InProgress => "In progress",
            ReportStatus::NeedsReview => "Needs review",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recoverable data issues, resolved deterministically and kept on the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    AmbiguousCampaignName {
        campaign_id: String,
        chosen: String,
        names: Vec<String>,
    },
    DuplicateInsightRow {
        campaign_id: String,
        date: NaiveDate,
    },
    RowOutsideWindow {
        campaign_id: String,
        date: NaiveDate,
    },
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWarning::AmbiguousCampaignName {
                campaign_id,
                chosen,
                names,
            } => write!(
                f,
                "campaign {campaign_id} was reported under several names ({}); using \"{chosen}\"",
                names.join(", ")
            ),
            ReportWarning::DuplicateInsightRow { campaign_id, date } => {
                write!(f, "duplicate row for campaign {campaign_id} on {date} was ignored")
            }
            ReportWarning::RowOutsideWindow { campaign_id, date } => {
                write!(f, "row for campaign {campaign_id} on {date} is outside the report window")
            }
        }
    }
}

/// The assembled report for one week. Built fresh on every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub totals: CampaignSummary,
    /// Sorted by spend descending, then campaign id ascending.
    pub campaigns: Vec<CampaignSummary>,
    /// One entry per dimension present in the input, in dimension order.
    pub audiences: Vec<AudienceBreakdown>,
    pub status: ReportStatus,
    pub warnings: Vec<ReportWarning>,
}
