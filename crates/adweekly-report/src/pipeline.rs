//! Weekly run orchestration: fetch, assemble, plan, write.
//!
//! The run is all-or-nothing. The store is only written after the report has
//! been fully assembled and rendered, and a failed run leaves it untouched.

use adweekly_core::{ReportSettings, ReportWindow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::assemble::build_weekly_report;
use crate::document::{render, ReportDocument};
use crate::error::PipelineError;
use crate::ports::{InsightSource, ReportStore, StoreReceipt};
use crate::sync::{plan, SyncAction, SyncPlan};
use crate::types::WeeklyReport;

/// Inputs of one run besides the adapters.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub window: ReportWindow,
    pub settings: &'a ReportSettings,
    /// Generation time; decides whether the week is still in progress.
    pub now: DateTime<Utc>,
    /// Plan and render but skip the store write.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub report: WeeklyReport,
    pub document: ReportDocument,
    pub plan: SyncPlan,
    /// `None` for dry runs.
    pub receipt: Option<StoreReceipt>,
}

impl RunOutcome {
    #[must_use]
    pub fn summary_line(&self) -> String {
        let verb = match (self.receipt.is_some(), self.plan.action) {
            (true, SyncAction::Create) => "created",
            (true, SyncAction::Update) => "updated",
            (false, SyncAction::Create) => "would be created",
            (false, SyncAction::Update) => "would be updated",
        };
        let props = &self.document.properties;
        let roas = props
            .roas
            .map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"));
        let mut line = format!(
            "{} {verb}: spend {:.2} across {} campaigns, ROAS {roas}, status {}",
            self.document.title, props.total_spend, props.campaign_count, props.status
        );
        if !self.report.warnings.is_empty() {
            line.push_str(&format!(" ({} warnings)", self.report.warnings.len()));
        }
        if let Some(url) = self.receipt.as_ref().and_then(|r| r.url.as_deref()) {
            line.push_str(&format!(" {url}"));
        }
        line
    }
}

/// Run the full weekly pipeline against the given adapters.
///
/// Insights and demographics are fetched concurrently; aggregation and
/// assembly are pure. The existing-key snapshot is read right before planning.
///
/// # Errors
///
/// - [`PipelineError::Fetch`] if the source fails.
/// - [`PipelineError::Report`] for data errors; nothing is written.
/// - [`PipelineError::Store`] if reading keys or writing the entry fails.
pub async fn run_weekly_sync<S, T>(
    source: &S,
    store: &T,
    request: RunRequest<'_>,
) -> Result<RunOutcome, PipelineError>
where
    S: InsightSource,
    T: ReportStore,
{
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "weekly_run",
        %run_id,
        week_start = %request.window.start(),
        dry_run = request.dry_run
    );
    execute(run_id, source, store, request).instrument(span).await
}

async fn execute<S, T>(
    run_id: Uuid,
    source: &S,
    store: &T,
    request: RunRequest<'_>,
) -> Result<RunOutcome, PipelineError>
where
    S: InsightSource,
    T: ReportStore,
{
    let window = request.window;

    let (insights, demographics) = futures::try_join!(
        source.fetch_insights(&window),
        source.fetch_demographics(&window)
    )
    .map_err(|e| PipelineError::Fetch(Box::new(e)))?;
    tracing::info!(
        insights = insights.len(),
        demographics = demographics.len(),
        "fetched raw rows"
    );

    let report = build_weekly_report(window, &insights, &demographics, request.now)?;
    for warning in &report.warnings {
        tracing::warn!(%warning, "report warning");
    }
    let document = render(&report, request.settings);

    let existing = store
        .existing_week_keys()
        .await
        .map_err(|e| PipelineError::Store(Box::new(e)))?;
    let decision = plan(&existing, &report);

    let receipt = if request.dry_run {
        tracing::info!(
            action = %decision.action,
            key = %decision.key,
            "dry run, skipping store write"
        );
        None
    } else {
        let receipt = store
            .apply(&decision, &document)
            .await
            .map_err(|e| PipelineError::Store(Box::new(e)))?;
        tracing::info!(
            action = %decision.action,
            entry_id = %receipt.entry_id,
            "stored weekly report"
        );
        Some(receipt)
    };

    Ok(RunOutcome {
        run_id,
        report,
        document,
        plan: decision,
        receipt,
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
