//! Weekly ad performance report pipeline.
//!
//! Raw daily insight rows and demographic breakdowns go in; a fully assembled
//! [`WeeklyReport`], its rendered [`ReportDocument`], and an idempotent
//! create-or-update [`SyncPlan`] come out. Aggregation and assembly are pure;
//! the async [`run_weekly_sync`] drives the fetch and store adapters around them.

pub mod assemble;
pub mod audience;
pub mod campaigns;
pub mod document;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod ports;
pub mod signal;
pub mod sync;
pub mod types;

pub use assemble::{assemble_report, build_weekly_report};
pub use audience::aggregate_audiences;
pub use campaigns::{aggregate_campaigns, CampaignRollup, CampaignTotals};
pub use document::{entry_title, render, Block, ReportDocument, ReportProperties, Section};
pub use error::{MetricInputError, PipelineError, ReportError};
pub use metrics::{compute, DerivedMetrics, RawCounters};
pub use pipeline::{run_weekly_sync, RunOutcome, RunRequest};
pub use ports::{InsightSource, Notifier, ReportStore, StoreReceipt};
pub use signal::RunSignal;
pub use sync::{plan, SyncAction, SyncPlan};
pub use types::{
    AudienceBreakdown, AudienceBucket, CampaignSummary, ReportStatus, ReportWarning, WeeklyReport,
};
