//! Conversion of Graph API rows into pipeline rows.
//!
//! Missing numeric fields count as zero. Present but unparseable values are
//! errors rather than silent zeros.

use adweekly_core::{DemographicRow, Dimension, InsightRow};
use chrono::NaiveDate;

use crate::error::MetaError;
use crate::types::{ActionStat, BreakdownInsight, CampaignInsight, NumericField};

/// Action types counted as conversions.
pub const CONVERSION_ACTIONS: [&str; 2] = ["purchase", "lead"];
/// Action value types used as revenue, first match wins.
pub const REVENUE_ACTIONS: [&str; 2] = ["omni_purchase", "purchase"];

/// Bucket label used when the platform omits the breakdown value.
const UNKNOWN_BUCKET: &str = "unknown";

/// Prefix the account id with `act_` unless it already has it.
#[must_use]
pub fn normalize_account_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("act_") {
        trimmed.to_string()
    } else {
        format!("act_{trimmed}")
    }
}

/// # Errors
///
/// Returns [`MetaError::Normalization`] for unparseable dates or numbers.
pub fn campaign_row(raw: CampaignInsight) -> Result<InsightRow, MetaError> {
    let date = NaiveDate::parse_from_str(&raw.date_start, "%Y-%m-%d").map_err(|e| {
        MetaError::Normalization {
            field: "date_start".to_string(),
            value: raw.date_start.clone(),
            reason: e.to_string(),
        }
    })?;

    let mut conversions = 0u64;
    for action_type in CONVERSION_ACTIONS {
        if let Some(stat) = find_action(&raw.actions, action_type) {
            conversions += parse_count("actions", Some(&stat.value))?;
        }
    }

    let revenue = match REVENUE_ACTIONS
        .iter()
        .find_map(|t| find_action(&raw.action_values, t))
    {
        Some(stat) => parse_amount("action_values", Some(&stat.value))?,
        None => 0.0,
    };

    Ok(InsightRow {
        campaign_id: raw.campaign_id,
        campaign_name: raw.campaign_name,
        date,
        spend: parse_amount("spend", raw.spend.as_ref())?,
        impressions: parse_count("impressions", raw.impressions.as_ref())?,
        clicks: parse_count("clicks", raw.clicks.as_ref())?,
        conversions,
        revenue,
    })
}

/// # Errors
///
/// Returns [`MetaError::Normalization`] for unparseable numbers.
pub fn breakdown_row(dimension: Dimension, raw: BreakdownInsight) -> Result<DemographicRow, MetaError> {
    let bucket = match dimension {
        Dimension::Age => raw.age,
        Dimension::Gender => raw.gender,
        Dimension::Region => raw.region,
    }
    .filter(|b| !b.trim().is_empty())
    .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());

    Ok(DemographicRow {
        dimension,
        bucket,
        impressions: parse_count("impressions", raw.impressions.as_ref())?,
        clicks: parse_count("clicks", raw.clicks.as_ref())?,
        spend: parse_amount("spend", raw.spend.as_ref())?,
    })
}

fn find_action<'a>(stats: &'a [ActionStat], action_type: &str) -> Option<&'a ActionStat> {
    stats.iter().find(|s| s.action_type == action_type)
}

fn parse_amount(field: &str, value: Option<&NumericField>) -> Result<f64, MetaError> {
    let parsed = match value {
        None => return Ok(0.0),
        Some(NumericField::Number(n)) => *n,
        Some(NumericField::Text(s)) if s.trim().is_empty() => return Ok(0.0),
        Some(NumericField::Text(s)) => s.trim().parse::<f64>().map_err(|e| MetaError::Normalization {
            field: field.to_string(),
            value: s.clone(),
            reason: e.to_string(),
        })?,
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(MetaError::Normalization {
            field: field.to_string(),
            value: parsed.to_string(),
            reason: "not a finite number".to_string(),
        })
    }
}

fn parse_count(field: &str, value: Option<&NumericField>) -> Result<u64, MetaError> {
    match value {
        None => Ok(0),
        Some(NumericField::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(NumericField::Text(s)) => s.trim().parse::<u64>().map_err(|e| MetaError::Normalization {
            field: field.to_string(),
            value: s.clone(),
            reason: e.to_string(),
        }),
        Some(NumericField::Number(n)) => {
            if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(*n as u64)
            } else {
                Err(MetaError::Normalization {
                    field: field.to_string(),
                    value: n.to_string(),
                    reason: "expected a non-negative whole number".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(json: serde_json::Value) -> CampaignInsight {
        serde_json::from_value(json).expect("fixture should deserialize")
    }

    #[test]
    fn account_id_gets_prefix_once() {
        assert_eq!(normalize_account_id("12345"), "act_12345");
        assert_eq!(normalize_account_id("act_12345"), "act_12345");
        assert_eq!(normalize_account_id(" 12345 "), "act_12345");
    }

    #[test]
    fn campaign_row_parses_string_numbers_and_actions() {
        let row = campaign_row(campaign(serde_json::json!({
            "campaign_id": "120",
            "campaign_name": "Spring Sale",
            "date_start": "2025-03-04",
            "date_stop": "2025-03-04",
            "spend": "12.34",
            "impressions": "1500",
            "clicks": "45",
            "actions": [
                { "action_type": "link_click", "value": "40" },
                { "action_type": "purchase", "value": "2" },
                { "action_type": "lead", "value": "3" }
            ],
            "action_values": [
                { "action_type": "purchase", "value": "50.00" },
                { "action_type": "omni_purchase", "value": "60.5" }
            ]
        })))
        .unwrap();

        assert_eq!(row.campaign_id, "120");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(row.spend, 12.34);
        assert_eq!(row.impressions, 1500);
        assert_eq!(row.clicks, 45);
        assert_eq!(row.conversions, 5);
        assert_eq!(row.revenue, 60.5);
    }

    #[test]
    fn revenue_falls_back_to_purchase_value() {
        let row = campaign_row(campaign(serde_json::json!({
            "campaign_id": "1",
            "date_start": "2025-03-04",
            "action_values": [{ "action_type": "purchase", "value": 9.5 }]
        })))
        .unwrap();
        assert_eq!(row.revenue, 9.5);
        assert_eq!(row.spend, 0.0);
        assert_eq!(row.campaign_name, "");
    }

    #[test]
    fn bad_spend_is_an_error() {
        let err = campaign_row(campaign(serde_json::json!({
            "campaign_id": "1",
            "date_start": "2025-03-04",
            "spend": "twelve"
        })))
        .unwrap_err();
        assert!(matches!(err, MetaError::Normalization { ref field, .. } if field == "spend"));
    }

    #[test]
    fn bad_date_is_an_error() {
        let err = campaign_row(campaign(serde_json::json!({
            "campaign_id": "1",
            "date_start": "04/03/2025"
        })))
        .unwrap_err();
        assert!(matches!(err, MetaError::Normalization { ref field, .. } if field == "date_start"));
    }

    #[test]
    fn fractional_count_is_an_error() {
        let err = parse_count("clicks", Some(&NumericField::Number(1.5))).unwrap_err();
        assert!(matches!(err, MetaError::Normalization { .. }));
    }

    #[test]
    fn breakdown_row_picks_requested_key() {
        let raw: BreakdownInsight = serde_json::from_value(serde_json::json!({
            "age": "25-34",
            "impressions": "900",
            "clicks": "12",
            "spend": "30.1"
        }))
        .unwrap();
        let row = breakdown_row(Dimension::Age, raw).unwrap();
        assert_eq!(row.bucket, "25-34");
        assert_eq!(row.impressions, 900);
        assert_eq!(row.spend, 30.1);
    }

    #[test]
    fn breakdown_row_without_bucket_is_unknown() {
        let raw: BreakdownInsight =
            serde_json::from_value(serde_json::json!({ "impressions": "3" })).unwrap();
        let row = breakdown_row(Dimension::Region, raw).unwrap();
        assert_eq!(row.bucket, "unknown");
    }
}
