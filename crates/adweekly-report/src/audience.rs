//! Ranked demographic distributions.

use std::collections::BTreeMap;

use adweekly_core::{DemographicRow, Dimension};

use crate::error::ReportError;
use crate::metrics::{check_amount, ratio};
use crate::types::{AudienceBreakdown, AudienceBucket};

#[derive(Default)]
struct BucketSums {
    impressions: u64,
    clicks: u64,
    spend: f64,
}

/// Sum demographic rows per `(dimension, bucket)` and rank each dimension.
///
/// Buckets are ordered by impressions descending, ties by label. Shares are
/// relative to the dimension's own totals, so each dimension sums to 1.0 on
/// its own. A dimension whose buckets saw no impressions is omitted.
///
/// # Errors
///
/// Returns [`ReportError::InvalidMetricInput`] for negative or non-finite spend.
pub fn aggregate_audiences(rows: &[DemographicRow]) -> Result<Vec<AudienceBreakdown>, ReportError> {
    for row in rows {
        check_amount("spend", row.spend).map_err(|source| ReportError::InvalidMetricInput {
            subject: format!("{} bucket '{}'", row.dimension, row.bucket),
            source,
        })?;
    }

    let mut ordered: Vec<&DemographicRow> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        a.dimension
            .cmp(&b.dimension)
            .then_with(|| a.bucket.cmp(&b.bucket))
            .then(a.spend.total_cmp(&b.spend))
    });

    let mut sums: BTreeMap<Dimension, BTreeMap<&str, BucketSums>> = BTreeMap::new();
    for row in ordered {
        let bucket = sums
            .entry(row.dimension)
            .or_default()
            .entry(row.bucket.as_str())
            .or_default();
        bucket.impressions += row.impressions;
        bucket.clicks += row.clicks;
        bucket.spend += row.spend;
    }

    let mut breakdowns = Vec::with_capacity(sums.len());
    for (dimension, buckets) in sums {
        let total_impressions: u64 = buckets.values().map(|b| b.impressions).sum();
        if total_impressions == 0 {
            tracing::debug!(%dimension, "omitting dimension with no impressions");
            continue;
        }
        let total_spend: f64 = buckets.values().map(|b| b.spend).sum();

        #[allow(clippy::cast_precision_loss)]
        let mut ranked: Vec<AudienceBucket> = buckets
            .into_iter()
            .map(|(label, sums)| AudienceBucket {
                bucket: label.to_string(),
                impressions: sums.impressions,
                clicks: sums.clicks,
                spend: sums.spend,
                share_of_impressions: sums.impressions as f64 / total_impressions as f64,
                share_of_spend: ratio(sums.spend, total_spend),
                ctr: ratio(sums.clicks as f64, sums.impressions as f64),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.impressions
                .cmp(&a.impressions)
                .then_with(|| a.bucket.cmp(&b.bucket))
        });

        breakdowns.push(AudienceBreakdown {
            dimension,
            buckets: ranked,
        });
    }

    Ok(breakdowns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dimension: Dimension, bucket: &str, impressions: u64, clicks: u64, spend: f64) -> DemographicRow {
        DemographicRow {
            dimension,
            bucket: bucket.to_string(),
            impressions,
            clicks,
            spend,
        }
    }

    #[test]
    fn sums_buckets_across_rows_and_ranks_by_impressions() {
        let rows = vec![
            row(Dimension::Age, "25-34", 100, 5, 10.0),
            row(Dimension::Age, "18-24", 300, 9, 20.0),
            row(Dimension::Age, "25-34", 250, 5, 10.0),
        ];
        let breakdowns = aggregate_audiences(&rows).unwrap();
        assert_eq!(breakdowns.len(), 1);
        let age = &breakdowns[0];
        assert_eq!(age.dimension, Dimension::Age);
        let labels: Vec<&str> = age.buckets.iter().map(|b| b.bucket.as_str()).collect();
        assert_eq!(labels, vec!["25-34", "18-24"]);
        assert_eq!(age.buckets[0].impressions, 350);
        assert_eq!(age.buckets[0].spend, 20.0);
    }

    #[test]
    fn ties_are_broken_by_label() {
        let rows = vec![
            row(Dimension::Region, "Seoul", 50, 1, 1.0),
            row(Dimension::Region, "Busan", 50, 1, 1.0),
            row(Dimension::Region, "Daegu", 80, 1, 1.0),
        ];
        let breakdowns = aggregate_audiences(&rows).unwrap();
        let labels: Vec<&str> = breakdowns[0].buckets.iter().map(|b| b.bucket.as_str()).collect();
        assert_eq!(labels, vec!["Daegu", "Busan", "Seoul"]);
    }

    #[test]
    fn shares_sum_to_one_per_dimension() {
        let rows = vec![
            row(Dimension::Age, "18-24", 333, 1, 1.1),
            row(Dimension::Age, "25-34", 333, 1, 2.2),
            row(Dimension::Age, "35-44", 334, 1, 3.3),
            row(Dimension::Gender, "female", 7, 1, 0.7),
            row(Dimension::Gender, "male", 3, 1, 0.1),
        ];
        for breakdown in aggregate_audiences(&rows).unwrap() {
            let impressions: f64 = breakdown.buckets.iter().map(|b| b.share_of_impressions).sum();
            let spend: f64 = breakdown
                .buckets
                .iter()
                .map(|b| b.share_of_spend.unwrap())
                .sum();
            assert!((impressions - 1.0).abs() < 1e-6, "{}: {impressions}", breakdown.dimension);
            assert!((spend - 1.0).abs() < 1e-6, "{}: {spend}", breakdown.dimension);
        }
    }

    #[test]
    fn shares_are_relative_to_their_own_dimension() {
        let rows = vec![
            row(Dimension::Age, "18-24", 1000, 1, 1.0),
            row(Dimension::Gender, "female", 10, 1, 1.0),
        ];
        let breakdowns = aggregate_audiences(&rows).unwrap();
        assert_eq!(breakdowns[1].dimension, Dimension::Gender);
        assert_eq!(breakdowns[1].buckets[0].share_of_impressions, 1.0);
    }

    #[test]
    fn dimension_without_impressions_is_omitted() {
        let rows = vec![
            row(Dimension::Age, "18-24", 10, 1, 1.0),
            row(Dimension::Region, "Seoul", 0, 0, 0.0),
        ];
        let breakdowns = aggregate_audiences(&rows).unwrap();
        assert_eq!(breakdowns.len(), 1);
        assert_eq!(breakdowns[0].dimension, Dimension::Age);
    }

    #[test]
    fn spend_share_is_undefined_without_spend() {
        let rows = vec![row(Dimension::Gender, "male", 10, 0, 0.0)];
        let breakdowns = aggregate_audiences(&rows).unwrap();
        assert_eq!(breakdowns[0].buckets[0].share_of_spend, None);
        assert_eq!(breakdowns[0].buckets[0].ctr, Some(0.0));
    }

    #[test]
    fn dimensions_come_out_in_section_order() {
        let rows = vec![
            row(Dimension::Region, "Seoul", 1, 0, 0.0),
            row(Dimension::Age, "18-24", 1, 0, 0.0),
            row(Dimension::Gender, "male", 1, 0, 0.0),
        ];
        let dims: Vec<Dimension> = aggregate_audiences(&rows)
            .unwrap()
            .into_iter()
            .map(|b| b.dimension)
            .collect();
        assert_eq!(dims, Dimension::ALL.to_vec());
    }

    #[test]
    fn negative_spend_is_rejected() {
        let err = aggregate_audiences(&[row(Dimension::Age, "18-24", 1, 0, -1.0)]).unwrap_err();
        assert!(matches!(err, ReportError::InvalidMetricInput { ref subject, .. } if subject.contains("18-24")));
    }
}
