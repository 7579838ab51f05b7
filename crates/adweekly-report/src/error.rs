use chrono::NaiveDate;
use thiserror::Error;

/// A counter handed to the metrics calculator was negative or not a number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be a finite non-negative number, got {value}")]
pub struct MetricInputError {
    pub field: &'static str,
    pub value: f64,
}

/// Failures of the deterministic aggregation and assembly stages.
///
/// None of these are retried: the same input always fails the same way.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid metric input for {subject}: {source}")]
    InvalidMetricInput {
        subject: String,
        #[source]
        source: MetricInputError,
    },

    #[error("campaign {campaign_id} reports {clicks} clicks for {impressions} impressions")]
    ClicksExceedImpressions {
        campaign_id: String,
        clicks: u64,
        impressions: u64,
    },

    #[error("conflicting insight rows for campaign {campaign_id} on {date}")]
    ConflictingInsightRows { campaign_id: String, date: NaiveDate },

    #[error("no insight rows were supplied for {start}..={end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

impl ReportError {
    /// Stable identifier used in failure notifications.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::InvalidMetricInput { .. } => "invalid_metric_input",
            ReportError::ClicksExceedImpressions { .. } => "clicks_exceed_impressions",
            ReportError::ConflictingInsightRows { .. } => "conflicting_insight_rows",
            ReportError::EmptyWindow { .. } => "empty_window",
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a whole weekly run, as seen by the orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching ad insights failed: {0}")]
    Fetch(#[source] BoxError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("document store call failed: {0}")]
    Store(#[source] BoxError),
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch_failed",
            PipelineError::Report(inner) => inner.kind(),
            PipelineError::Store(_) => "store_failed",
        }
    }
}
