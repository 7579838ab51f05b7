//! Database schema and page property payloads.

use adweekly_report::{ReportDocument, ReportStatus};
use chrono::NaiveDate;
use serde_json::{json, Value};

pub const TITLE: &str = "Report";
pub const WEEK: &str = "Week";
pub const TOTAL_SPEND: &str = "Total Spend";
pub const TOTAL_IMPRESSIONS: &str = "Total Impressions";
pub const TOTAL_CLICKS: &str = "Total Clicks";
pub const TOTAL_CONVERSIONS: &str = "Total Conversions";
pub const TOTAL_REVENUE: &str = "Total Revenue";
pub const AVG_CPC: &str = "Avg CPC";
pub const AVG_CTR: &str = "Avg CTR";
pub const AVG_CPA: &str = "Avg CPA";
pub const ROAS: &str = "ROAS";
pub const CAMPAIGNS: &str = "Campaigns";
pub const STATUS: &str = "Status";

const STATUSES: [ReportStatus; 3] = [
    ReportStatus::Complete,
    ReportStatus::InProgress,
    ReportStatus::NeedsReview,
];

/// Property values for one report page. Undefined metrics are sent as
/// `null`, which Notion renders as an empty cell.
#[must_use]
pub fn page_properties(document: &ReportDocument) -> Value {
    let p = &document.properties;
    json!({
        TITLE: { "title": [{ "text": { "content": document.title } }] },
        WEEK: { "date": { "start": p.week_start.to_string(), "end": p.week_end.to_string() } },
        TOTAL_SPEND: { "number": p.total_spend },
        TOTAL_IMPRESSIONS: { "number": p.total_impressions },
        TOTAL_CLICKS: { "number": p.total_clicks },
        TOTAL_CONVERSIONS: { "number": p.total_conversions },
        TOTAL_REVENUE: { "number": p.total_revenue },
        AVG_CPC: { "number": p.avg_cpc },
        AVG_CTR: { "number": p.avg_ctr },
        AVG_CPA: { "number": p.avg_cpa },
        ROAS: { "number": p.roas },
        CAMPAIGNS: { "number": p.campaign_count },
        STATUS: { "select": { "name": p.status.label() } },
    })
}

/// Column definitions for a fresh report database.
#[must_use]
pub fn database_schema(currency: &str) -> Value {
    let money = json!({ "number": { "format": money_format(currency) } });
    let count = json!({ "number": { "format": "number_with_commas" } });
    let options: Vec<Value> = STATUSES
        .iter()
        .map(|s| json!({ "name": s.label(), "color": status_color(*s) }))
        .collect();

    json!({
        TITLE: { "title": {} },
        WEEK: { "date": {} },
        TOTAL_SPEND: money,
        TOTAL_IMPRESSIONS: count,
        TOTAL_CLICKS: count,
        TOTAL_CONVERSIONS: count,
        TOTAL_REVENUE: money,
        AVG_CPC: money,
        AVG_CTR: { "number": { "format": "percent" } },
        AVG_CPA: money,
        ROAS: { "number": { "format": "number" } },
        CAMPAIGNS: { "number": { "format": "number" } },
        STATUS: { "select": { "options": options } },
    })
}

/// Database query filter matching pages whose `Week` starts on `week_start`.
#[must_use]
pub fn week_filter(week_start: NaiveDate) -> Value {
    json!({ "property": WEEK, "date": { "equals": week_start.to_string() } })
}

/// Start of the `Week` date property; `None` when absent or unparseable.
#[must_use]
pub fn week_start(properties: &Value) -> Option<NaiveDate> {
    let raw = properties.get(WEEK)?.get("date")?.get("start")?.as_str()?;
    // Date-time values carry the date in the first ten characters.
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn money_format(currency: &str) -> &'static str {
    match currency.to_ascii_uppercase().as_str() {
        "KRW" => "won",
        "USD" => "dollar",
        "EUR" => "euro",
        "JPY" => "yen",
        "GBP" => "pound",
        _ => "number_with_commas",
    }
}

fn status_color(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Complete => "green",
        ReportStatus::InProgress => "yellow",
        ReportStatus::NeedsReview => "red",
    }
}
