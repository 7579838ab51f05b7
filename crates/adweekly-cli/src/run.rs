//! `run` and `plan` command handlers.

use std::path::Path;

use adweekly_core::{load_report_settings, AppConfig, DemographicRow, InsightRow, ReportWindow};
use adweekly_meta::MetaClient;
use adweekly_notion::NotionClient;
use adweekly_report::{
    build_weekly_report, render, run_weekly_sync, Notifier, ReportDocument, RunRequest, RunSignal,
    WeeklyReport,
};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::SlackNotifier;

/// Raw rows captured from a previous fetch, used by `plan`.
#[derive(Debug, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub insights: Vec<InsightRow>,
    #[serde(default)]
    pub demographics: Vec<DemographicRow>,
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    report: WeeklyReport,
    document: ReportDocument,
}

/// Runs the weekly sync and delivers the outcome to Slack when configured.
///
/// Dry runs are not announced. A notification failure is logged and does
/// not change the command's result.
///
/// # Errors
///
/// Returns an error if settings or clients cannot be built, or if the
/// pipeline fails.
pub(crate) async fn run_weekly(
    config: &AppConfig,
    week_end: Option<NaiveDate>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let settings = load_report_settings(config.settings_path.as_deref())
        .context("failed to load report settings")?;
    let now = Utc::now();
    let window = match week_end {
        Some(end) => ReportWindow::ending_on(end)?,
        None => ReportWindow::last_full_week(now.date_naive())?,
    };

    let meta = MetaClient::from_app_config(config).context("failed to build Meta client")?;
    let notion = NotionClient::from_app_config(config).context("failed to build Notion client")?;

    tracing::info!(window = %window, dry_run, env = %config.env, "starting weekly report run");
    let result = run_weekly_sync(
        &meta,
        &notion,
        RunRequest {
            window,
            settings: &settings,
            now,
            dry_run,
        },
    )
    .await;

    if !dry_run {
        if let Some(url) = config.slack_webhook_url.as_deref() {
            let notifier = SlackNotifier::new(url, config.http_timeout_secs)
                .context("failed to build Slack notifier")?;
            if let Err(err) = notifier.notify(&RunSignal::from_result(&result)).await {
                tracing::warn!(error = %err, "failed to deliver Slack notification");
            }
        }
    }

    let outcome = result?;
    println!("{}", outcome.summary_line());
    Ok(())
}

/// Builds and renders the report from a snapshot file and prints both as JSON.
///
/// # Errors
///
/// Returns an error if the snapshot or settings cannot be read, or if the
/// report cannot be assembled.
pub(crate) fn run_plan(
    input: &Path,
    week_end: Option<NaiveDate>,
    settings_path: Option<&Path>,
) -> anyhow::Result<()> {
    let settings = load_report_settings(settings_path).context("failed to load report settings")?;
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read snapshot {}", input.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", input.display()))?;

    let window = snapshot_window(&snapshot, week_end)?;
    let report = build_weekly_report(window, &snapshot.insights, &snapshot.demographics, Utc::now())?;
    for warning in &report.warnings {
        tracing::warn!(%warning, "report warning");
    }
    let document = render(&report, &settings);

    let output = serde_json::to_string_pretty(&PlanOutput { report, document })?;
    println!("{output}");
    Ok(())
}

/// Window ending on `week_end`, or on the latest insight date in the snapshot.
pub(crate) fn snapshot_window(
    snapshot: &Snapshot,
    week_end: Option<NaiveDate>,
) -> anyhow::Result<ReportWindow> {
    let end = match week_end {
        Some(end) => end,
        None => snapshot
            .insights
            .iter()
            .map(|row| row.date)
            .max()
            .ok_or_else(|| {
                anyhow::anyhow!("snapshot has no insight rows; pass --week-end to choose a window")
            })?,
    };
    Ok(ReportWindow::ending_on(end)?)
}
