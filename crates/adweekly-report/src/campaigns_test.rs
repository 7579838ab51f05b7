use chrono::NaiveDate;

use super::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn row(id: &str, name: &str, d: u32, spend: f64, impressions: u64, clicks: u64) -> InsightRow {
    InsightRow {
        campaign_id: id.to_string(),
        campaign_name: name.to_string(),
        date: day(d),
        spend,
        impressions,
        clicks,
        conversions: 0,
        revenue: 0.0,
    }
}

#[test]
fn sums_rows_per_campaign() {
    let rows = vec![
        row("1", "Alpha", 3, 10.0, 100, 5),
        row("2", "Beta", 3, 1.0, 10, 1),
        row("1", "Alpha", 4, 5.0, 50, 2),
    ];
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.row_count, 3);
    assert_eq!(rollup.campaigns.len(), 2);
    let alpha = &rollup.campaigns["1"];
    assert_eq!(alpha.name, "Alpha");
    assert_eq!(alpha.counters.spend, 15.0);
    assert_eq!(alpha.counters.impressions, 150);
    assert_eq!(alpha.counters.clicks, 7);
    assert!(rollup.warnings.is_empty());
}

#[test]
fn groups_by_id_and_keeps_most_frequent_name() {
    let mut rows = Vec::new();
    for d in 3..=6 {
        rows.push(row("7", "Sale", d, 1.0, 10, 1));
    }
    for d in 7..=9 {
        rows.push(row("7", "Sale v2", d, 1.0, 10, 1));
    }
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.campaigns.len(), 1);
    assert_eq!(rollup.campaigns["7"].name, "Sale");
    assert_eq!(
        rollup.warnings,
        vec![ReportWarning::AmbiguousCampaignName {
            campaign_id: "7".to_string(),
            chosen: "Sale".to_string(),
            names: vec!["Sale".to_string(), "Sale v2".to_string()],
        }]
    );
}

#[test]
fn name_tie_goes_to_earliest_name_regardless_of_order() {
    let forward = vec![
        row("7", "Old", 3, 1.0, 10, 1),
        row("7", "New", 4, 1.0, 10, 1),
    ];
    let mut backward = forward.clone();
    backward.reverse();
    assert_eq!(aggregate_campaigns(&forward).unwrap().campaigns["7"].name, "Old");
    assert_eq!(aggregate_campaigns(&backward).unwrap().campaigns["7"].name, "Old");
}

#[test]
fn blank_names_are_ignored_when_resolving() {
    let rows = vec![
        row("7", "", 3, 1.0, 10, 1),
        row("7", "  ", 4, 1.0, 10, 1),
        row("7", "Real", 5, 1.0, 10, 1),
    ];
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.campaigns["7"].name, "Real");
    assert!(rollup.warnings.is_empty());
}

#[test]
fn campaign_without_any_name_falls_back_to_id() {
    let rollup = aggregate_campaigns(&[row("99", "", 3, 1.0, 10, 1)]).unwrap();
    assert_eq!(rollup.campaigns["99"].name, "99");
}

#[test]
fn idle_campaigns_are_dropped() {
    let rows = vec![
        row("1", "Active", 3, 2.0, 20, 1),
        row("2", "Paused", 3, 0.0, 0, 0),
        row("2", "Paused", 4, 0.0, 0, 0),
    ];
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.campaigns.keys().collect::<Vec<_>>(), vec!["1"]);
    assert_eq!(rollup.row_count, 3);
}

#[test]
fn renamed_idle_campaign_leaves_no_name_warning() {
    let rows = vec![
        row("A", "Live", 3, 5.0, 50, 2),
        row("Z", "Old", 3, 0.0, 0, 0),
        row("Z", "Old v2", 4, 0.0, 0, 0),
    ];
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.campaigns.keys().collect::<Vec<_>>(), vec!["A"]);
    assert!(rollup.warnings.is_empty(), "unexpected warnings: {:?}", rollup.warnings);
}

#[test]
fn campaign_with_impressions_but_no_spend_is_kept() {
    let rollup = aggregate_campaigns(&[row("1", "Organic", 3, 0.0, 20, 0)]).unwrap();
    assert!(rollup.campaigns.contains_key("1"));
}

#[test]
fn exact_duplicate_rows_are_dropped_with_warning() {
    let rows = vec![row("1", "A", 3, 2.0, 20, 1), row("1", "A", 3, 2.0, 20, 1)];
    let rollup = aggregate_campaigns(&rows).unwrap();
    assert_eq!(rollup.campaigns["1"].counters.spend, 2.0);
    assert_eq!(
        rollup.warnings,
        vec![ReportWarning::DuplicateInsightRow {
            campaign_id: "1".to_string(),
            date: day(3),
        }]
    );
}

#[test]
fn conflicting_rows_for_same_day_fail() {
    let rows = vec![row("1", "A", 3, 2.0, 20, 1), row("1", "A", 3, 9.0, 20, 1)];
    let err = aggregate_campaigns(&rows).unwrap_err();
    assert!(
        matches!(err, ReportError::ConflictingInsightRows { ref campaign_id, date } if campaign_id == "1" && date == day(3))
    );
}

#[test]
fn negative_spend_fails_with_campaign_context() {
    let err = aggregate_campaigns(&[row("5", "Bad", 3, -4.0, 10, 1)]).unwrap_err();
    match err {
        ReportError::InvalidMetricInput { subject, source } => {
            assert!(subject.contains("campaign 5"), "subject: {subject}");
            assert_eq!(source.field, "spend");
        }
        other => panic!("expected InvalidMetricInput, got {other:?}"),
    }
}

#[test]
fn empty_input_produces_empty_rollup() {
    let rollup = aggregate_campaigns(&[]).unwrap();
    assert!(rollup.campaigns.is_empty());
    assert_eq!(rollup.row_count, 0);
}
