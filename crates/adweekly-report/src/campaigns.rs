//! Per-campaign weekly roll-up of daily insight rows.

use std::collections::{BTreeMap, HashMap};

use adweekly_core::InsightRow;
use chrono::NaiveDate;

use crate::error::ReportError;
use crate::metrics::{check_amount, RawCounters};
use crate::types::ReportWarning;

/// Summed counters for one campaign over the window.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignTotals {
    pub campaign_id: String,
    pub name: String,
    pub counters: RawCounters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRollup {
    /// Active campaigns keyed by campaign id.
    pub campaigns: BTreeMap<String, CampaignTotals>,
    pub warnings: Vec<ReportWarning>,
    /// Number of rows handed in, before de-duplication.
    pub row_count: usize,
}

#[derive(Default)]
struct NameTally {
    rows: usize,
    first_seen: Option<NaiveDate>,
}

/// Group insight rows by campaign id and sum them over the window.
///
/// Rows are grouped by id, never by name. When one id carries several names,
/// the name on the most rows wins (ties: earliest first appearance, then
/// lexical order) and an [`ReportWarning::AmbiguousCampaignName`] is recorded.
/// Campaigns with no activity at all are left out.
///
/// # Errors
///
/// - [`ReportError::InvalidMetricInput`] for negative or non-finite money.
/// - [`ReportError::ConflictingInsightRows`] when two different rows share a
///   `(campaign_id, date)` key. Exact duplicates are dropped with a warning.
pub fn aggregate_campaigns(rows: &[InsightRow]) -> Result<CampaignRollup, ReportError> {
    for row in rows {
        for (field, value) in [("spend", row.spend), ("revenue", row.revenue)] {
            check_amount(field, value).map_err(|source| ReportError::InvalidMetricInput {
                subject: format!("campaign {} on {}", row.campaign_id, row.date),
                source,
            })?;
        }
    }

    // Summing in a fixed order keeps float totals independent of arrival order.
    let mut ordered: Vec<&InsightRow> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        a.campaign_id
            .cmp(&b.campaign_id)
            .then(a.date.cmp(&b.date))
            .then(a.campaign_name.cmp(&b.campaign_name))
    });

    let mut warnings = Vec::new();
    let mut counters: BTreeMap<&str, RawCounters> = BTreeMap::new();
    let mut names: BTreeMap<&str, HashMap<&str, NameTally>> = BTreeMap::new();
    let mut previous: Option<&InsightRow> = None;

    for row in ordered {
        if let Some(prev) = previous {
            if prev.campaign_id == row.campaign_id && prev.date == row.date {
                if prev == row {
                    tracing::debug!(
                        campaign_id = %row.campaign_id,
                        date = %row.date,
                        "dropping duplicate insight row"
                    );
                    warnings.push(ReportWarning::DuplicateInsightRow {
                        campaign_id: row.campaign_id.clone(),
                        date: row.date,
                    });
                    continue;
                }
                return Err(ReportError::ConflictingInsightRows {
                    campaign_id: row.campaign_id.clone(),
                    date: row.date,
                });
            }
        }
        previous = Some(row);

        *counters.entry(row.campaign_id.as_str()).or_default() += &RawCounters {
            spend: row.spend,
            impressions: row.impressions,
            clicks: row.clicks,
            conversions: row.conversions,
            revenue: row.revenue,
        };

        let tallies = names.entry(row.campaign_id.as_str()).or_default();
        let name = row.campaign_name.trim();
        if !name.is_empty() {
            let tally = tallies.entry(name).or_default();
            tally.rows += 1;
            tally.first_seen = Some(tally.first_seen.map_or(row.date, |d| d.min(row.date)));
        }
    }

    let mut campaigns = BTreeMap::new();
    for (campaign_id, totals) in counters {
        if totals.is_idle() {
            tracing::debug!(campaign_id, "dropping campaign with no activity");
            continue;
        }

        let tallies = names.remove(campaign_id).unwrap_or_default();
        let name = resolve_name(campaign_id, &tallies, &mut warnings);

        campaigns.insert(
            campaign_id.to_string(),
            CampaignTotals {
                campaign_id: campaign_id.to_string(),
                name,
                counters: totals,
            },
        );
    }

    Ok(CampaignRollup {
        campaigns,
        warnings,
        row_count: rows.len(),
    })
}

fn resolve_name(
    campaign_id: &str,
    tallies: &HashMap<&str, NameTally>,
    warnings: &mut Vec<ReportWarning>,
) -> String {
    let chosen = tallies
        .iter()
        .min_by(|(a_name, a), (b_name, b)| {
            b.rows
                .cmp(&a.rows)
                .then(a.first_seen.cmp(&b.first_seen))
                .then(a_name.cmp(b_name))
        })
        .map_or_else(|| campaign_id.to_string(), |(name, _)| (*name).to_string());

    if tallies.len() > 1 {
        let mut seen: Vec<String> = tallies.keys().map(|n| (*n).to_string()).collect();
        seen.sort();
        tracing::warn!(
            campaign_id,
            chosen = %chosen,
            names = ?seen,
            "campaign reported under several names"
        );
        warnings.push(ReportWarning::AmbiguousCampaignName {
            campaign_id: campaign_id.to_string(),
            chosen: chosen.clone(),
            names: seen,
        });
    }

    chosen
}

#[cfg(test)]
#[path = "campaigns_test.rs"]
mod tests;
