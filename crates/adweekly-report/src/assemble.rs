//! Joins the aggregator outputs into one [`WeeklyReport`].

use adweekly_core::{DemographicRow, InsightRow, ReportWindow};
use chrono::{DateTime, NaiveDate, Utc};

use crate::audience::aggregate_audiences;
use crate::campaigns::{aggregate_campaigns, CampaignRollup};
use crate::error::ReportError;
use crate::metrics::{compute, RawCounters};
use crate::types::{AudienceBreakdown, CampaignSummary, ReportStatus, ReportWarning, WeeklyReport};

/// Name carried by the account-level totals row.
pub const TOTALS_NAME: &str = "All campaigns";

/// Build a report from raw rows in one call.
///
/// Rows dated outside `window` are set aside with a warning before anything is
/// summed. The campaign and audience aggregations share no state.
///
/// # Errors
///
/// Propagates every [`ReportError`] of the aggregation and assembly stages.
pub fn build_weekly_report(
    window: ReportWindow,
    insights: &[InsightRow],
    demographics: &[DemographicRow],
    now: DateTime<Utc>,
) -> Result<WeeklyReport, ReportError> {
    let (in_window, outside): (Vec<&InsightRow>, Vec<&InsightRow>) =
        insights.iter().partition(|row| window.contains(row.date));

    let mut outside_keys: Vec<(&str, NaiveDate)> = outside
        .iter()
        .map(|row| (row.campaign_id.as_str(), row.date))
        .collect();
    outside_keys.sort_unstable();
    outside_keys.dedup();
    let mut outside_warnings: Vec<ReportWarning> = outside_keys
        .into_iter()
        .map(|(campaign_id, date)| ReportWarning::RowOutsideWindow {
            campaign_id: campaign_id.to_string(),
            date,
        })
        .collect();
    if !outside_warnings.is_empty() {
        tracing::warn!(
            %window,
            count = outside.len(),
            "ignoring insight rows outside the report window"
        );
    }

    let in_window: Vec<InsightRow> = in_window.into_iter().cloned().collect();
    let mut rollup = aggregate_campaigns(&in_window)?;
    let audiences = aggregate_audiences(demographics)?;

    outside_warnings.append(&mut rollup.warnings);
    rollup.warnings = outside_warnings;

    assemble_report(window, rollup, audiences, now)
}

/// Combine a campaign roll-up and audience breakdowns into a report.
///
/// Totals are summed from raw counters first and only then turned into
/// ratios, so campaigns weigh in proportion to their volume.
///
/// # Errors
///
/// - [`ReportError::EmptyWindow`] when the roll-up saw no rows at all. A week
///   with rows but no spend is valid and yields a `needs_review` report.
/// - [`ReportError::ClicksExceedImpressions`] when a campaign's totals are
///   inconsistent.
/// - [`ReportError::InvalidMetricInput`] if a counter is negative.
pub fn assemble_report(
    window: ReportWindow,
    rollup: CampaignRollup,
    audiences: Vec<AudienceBreakdown>,
    now: DateTime<Utc>,
) -> Result<WeeklyReport, ReportError> {
    if rollup.row_count == 0 {
        return Err(ReportError::EmptyWindow {
            start: window.start(),
            end: window.end(),
        });
    }

    let mut campaigns = Vec::with_capacity(rollup.campaigns.len());
    let mut totals = RawCounters::default();

    for (campaign_id, campaign) in rollup.campaigns {
        if campaign.counters.clicks > campaign.counters.impressions {
            return Err(ReportError::ClicksExceedImpressions {
                campaign_id,
                clicks: campaign.counters.clicks,
                impressions: campaign.counters.impressions,
            });
        }
        let metrics = compute(&campaign.counters).map_err(|source| {
            ReportError::InvalidMetricInput {
                subject: format!("campaign {campaign_id}"),
                source,
            }
        })?;
        totals += &campaign.counters;
        campaigns.push(CampaignSummary {
            campaign_id: Some(campaign_id),
            name: campaign.name,
            counters: campaign.counters,
            metrics,
        });
    }

    let totals_metrics = compute(&totals).map_err(|source| ReportError::InvalidMetricInput {
        subject: "weekly totals".to_string(),
        source,
    })?;

    campaigns.sort_by(|a, b| {
        b.counters
            .spend
            .total_cmp(&a.counters.spend)
            .then_with(|| a.campaign_id.cmp(&b.campaign_id))
    });

    let totals = CampaignSummary {
        campaign_id: None,
        name: TOTALS_NAME.to_string(),
        counters: totals,
        metrics: totals_metrics,
    };

    let status = derive_status(window, &totals, &campaigns, now);
    tracing::info!(
        %window,
        campaigns = campaigns.len(),
        spend = totals.counters.spend,
        %status,
        "assembled weekly report"
    );

    Ok(WeeklyReport {
        week_start: window.start(),
        week_end: window.end(),
        totals,
        campaigns,
        audiences,
        status,
        warnings: rollup.warnings,
    })
}

/// `needs_review` takes precedence over `in_progress`.
fn derive_status(
    window: ReportWindow,
    totals: &CampaignSummary,
    campaigns: &[CampaignSummary],
    now: DateTime<Utc>,
) -> ReportStatus {
    let undefined_outcome = campaigns
        .iter()
        .any(|c| c.metrics.cpa.is_none() || c.metrics.roas.is_none());

    if undefined_outcome || totals.counters.spend == 0.0 {
        ReportStatus::NeedsReview
    } else if window.end() >= now.date_naive() {
        ReportStatus::InProgress
    } else {
        ReportStatus::Complete
    }
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;
