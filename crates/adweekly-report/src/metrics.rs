//! Derived advertising metrics.
//!
//! Every ratio is `None` when its denominator is zero. `None` is serialized as
//! `null` and must never be rendered as `0`: a campaign with no conversions has
//! no CPA, not a free one.

use serde::Serialize;

use crate::error::MetricInputError;

/// Additive counters for a campaign, a bucket, or the whole account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RawCounters {
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
}

impl RawCounters {
    /// True when nothing at all happened.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.spend == 0.0
            && self.impressions == 0
            && self.clicks == 0
            && self.conversions == 0
            && self.revenue == 0.0
    }
}

impl std::ops::AddAssign<&RawCounters> for RawCounters {
    fn add_assign(&mut self, rhs: &RawCounters) {
        self.spend += rhs.spend;
        self.impressions += rhs.impressions;
        self.clicks += rhs.clicks;
        self.conversions += rhs.conversions;
        self.revenue += rhs.revenue;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Cost per click.
    pub cpc: Option<f64>,
    /// Click-through rate as a fraction, `0.104` for 10.4%.
    pub ctr: Option<f64>,
    /// Cost per acquisition.
    pub cpa: Option<f64>,
    /// Return on ad spend.
    pub roas: Option<f64>,
}

/// Compute CPC, CTR, CPA and ROAS from raw counters.
///
/// # Errors
///
/// Returns [`MetricInputError`] if `spend` or `revenue` is negative or not
/// finite.
pub fn compute(counters: &RawCounters) -> Result<DerivedMetrics, MetricInputError> {
    check_amount("spend", counters.spend)?;
    check_amount("revenue", counters.revenue)?;

    #[allow(clippy::cast_precision_loss)]
    let (impressions, clicks, conversions) = (
        counters.impressions as f64,
        counters.clicks as f64,
        counters.conversions as f64,
    );

    Ok(DerivedMetrics {
        cpc: ratio(counters.spend, clicks),
        ctr: ratio(clicks, impressions),
        cpa: ratio(counters.spend, conversions),
        roas: ratio(counters.revenue, counters.spend),
    })
}

pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<(), MetricInputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MetricInputError { field, value })
    }
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}
