//! Store-agnostic payload for the weekly report page.
//!
//! The document store adapter maps [`ReportDocument`] onto its own wire
//! format. Numeric properties stay numeric (rounded for display); undefined
//! metrics stay `None` in properties and read `n/a` in text blocks.

use adweekly_core::{Dimension, ReportSettings};
use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{AudienceBreakdown, CampaignSummary, ReportStatus, WeeklyReport};

const ZERO_DECIMAL_CURRENCIES: [&str; 3] = ["KRW", "JPY", "VND"];
const UNDEFINED: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    /// Store key, equal to the week start.
    pub key: NaiveDate,
    pub title: String,
    pub properties: ReportProperties,
    pub sections: Vec<Section>,
}

/// Summary columns of the report entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportProperties {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_spend: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_revenue: f64,
    pub avg_cpc: Option<f64>,
    /// Fraction, `0.0123` for 1.23%.
    pub avg_ctr: Option<f64>,
    pub avg_cpa: Option<f64>,
    pub roas: Option<f64>,
    pub campaign_count: usize,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Callout { icon: String, lines: Vec<String> },
    Subheading { text: String },
    Bullet { text: String },
    Toggle { summary: String, details: Vec<String> },
}

/// Title of the store entry for a week.
#[must_use]
pub fn entry_title(week_start: NaiveDate) -> String {
    format!("Week of {week_start}")
}

#[must_use]
pub fn render(report: &WeeklyReport, settings: &ReportSettings) -> ReportDocument {
    let fmt = Formatter::new(&settings.currency);

    let mut sections = vec![
        summary_section(report, &fmt),
        campaign_section(&report.campaigns, settings.campaign_limit, &fmt),
        audience_section(&report.audiences, settings, &fmt),
    ];
    if !report.warnings.is_empty() {
        sections.push(Section {
            heading: "Review notes".to_string(),
            blocks: report
                .warnings
                .iter()
                .map(|w| Block::Bullet {
                    text: w.to_string(),
                })
                .collect(),
        });
    }

    ReportDocument {
        key: report.week_start,
        title: entry_title(report.week_start),
        properties: properties(report),
        sections,
    }
}

fn properties(report: &WeeklyReport) -> ReportProperties {
    let totals = &report.totals;
    ReportProperties {
        week_start: report.week_start,
        week_end: report.week_end,
        total_spend: round_to(totals.counters.spend, 2),
        total_impressions: totals.counters.impressions,
        total_clicks: totals.counters.clicks,
        total_conversions: totals.counters.conversions,
        total_revenue: round_to(totals.counters.revenue, 2),
        avg_cpc: totals.metrics.cpc.map(|v| round_to(v, 2)),
        avg_ctr: totals.metrics.ctr.map(|v| round_to(v, 4)),
        avg_cpa: totals.metrics.cpa.map(|v| round_to(v, 2)),
        roas: totals.metrics.roas.map(|v| round_to(v, 2)),
        campaign_count: report.campaigns.len(),
        status: report.status,
    }
}

fn summary_section(report: &WeeklyReport, fmt: &Formatter<'_>) -> Section {
    let t = &report.totals;
    let lines = vec![
        format!("Total spend: {}", fmt.money(t.counters.spend)),
        format!("Impressions: {}", group_thousands(t.counters.impressions)),
        format!("Clicks: {}", group_thousands(t.counters.clicks)),
        format!("Avg CPC: {}", fmt.money_opt(t.metrics.cpc)),
        format!("Avg CTR: {}", percent(t.metrics.ctr)),
        format!("Conversions: {}", group_thousands(t.counters.conversions)),
        format!("Avg CPA: {}", fmt.money_opt(t.metrics.cpa)),
        format!("ROAS: {}", decimal(t.metrics.roas)),
        format!("Status: {}", report.status.label()),
    ];
    Section {
        heading: "Weekly summary".to_string(),
        blocks: vec![Block::Callout {
            icon: "💰".to_string(),
            lines,
        }],
    }
}

fn campaign_section(campaigns: &[CampaignSummary], limit: usize, fmt: &Formatter<'_>) -> Section {
    let blocks = campaigns
        .iter()
        .take(limit)
        .map(|c| Block::Toggle {
            summary: format!(
                "{} | Spend: {} | ROAS: {}",
                c.name,
                fmt.money(c.counters.spend),
                decimal(c.metrics.roas)
            ),
            details: vec![
                format!(
                    "Impressions: {} | Clicks: {} | CTR: {}",
                    group_thousands(c.counters.impressions),
                    group_thousands(c.counters.clicks),
                    percent(c.metrics.ctr)
                ),
                format!(
                    "CPC: {} | Conversions: {} | CPA: {}",
                    fmt.money_opt(c.metrics.cpc),
                    group_thousands(c.counters.conversions),
                    fmt.money_opt(c.metrics.cpa)
                ),
            ],
        })
        .collect();

    Section {
        heading: "Campaign performance".to_string(),
        blocks,
    }
}

fn audience_section(
    audiences: &[AudienceBreakdown],
    settings: &ReportSettings,
    fmt: &Formatter<'_>,
) -> Section {
    let mut blocks = Vec::new();
    for breakdown in audiences {
        let limit = settings.audience_limit(breakdown.dimension);
        let heading = match limit {
            Some(n) if n < breakdown.buckets.len() => {
                format!("{} (Top {n})", dimension_heading(breakdown.dimension))
            }
            _ => dimension_heading(breakdown.dimension).to_string(),
        };
        blocks.push(Block::Subheading { text: heading });

        for bucket in breakdown.buckets.iter().take(limit.unwrap_or(usize::MAX)) {
            blocks.push(Block::Bullet {
                text: format!(
                    "{}: Spend {} ({}) | Impressions {} ({}) | Clicks {}",
                    settings.bucket_label(breakdown.dimension, &bucket.bucket),
                    fmt.money(bucket.spend),
                    percent(bucket.share_of_spend),
                    group_thousands(bucket.impressions),
                    percent(Some(bucket.share_of_impressions)),
                    group_thousands(bucket.clicks),
                ),
            });
        }
    }

    Section {
        heading: "Audience insights".to_string(),
        blocks,
    }
}

fn dimension_heading(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Age => "Age",
        Dimension::Gender => "Gender",
        Dimension::Region => "Region",
    }
}

struct Formatter<'a> {
    currency: &'a str,
    decimals: usize,
}

impl<'a> Formatter<'a> {
    fn new(currency: &'a str) -> Self {
        let decimals = if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
            0
        } else {
            2
        };
        Self { currency, decimals }
    }

    fn money(&self, amount: f64) -> String {
        let fixed = format!("{amount:.prec$}", prec = self.decimals);
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let grouped = whole
            .parse::<u64>()
            .map_or_else(|_| whole.to_string(), group_thousands);
        if frac.is_empty() {
            format!("{grouped} {}", self.currency)
        } else {
            format!("{grouped}.{frac} {}", self.currency)
        }
    }

    fn money_opt(&self, amount: Option<f64>) -> String {
        amount.map_or_else(|| UNDEFINED.to_string(), |a| self.money(a))
    }
}

fn percent(fraction: Option<f64>) -> String {
    fraction.map_or_else(|| UNDEFINED.to_string(), |f| format!("{:.2}%", f * 100.0))
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.2}"))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
