use adweekly_core::{DemographicRow, Dimension, InsightRow, ReportWindow};
use adweekly_report::InsightSource;
use futures::future::try_join_all;

use crate::client::MetaClient;
use crate::error::MetaError;

impl InsightSource for MetaClient {
    type Error = MetaError;

    async fn fetch_insights(&self, window: &ReportWindow) -> Result<Vec<InsightRow>, MetaError> {
        self.campaign_insights(window).await
    }

    /// One breakdown query per dimension, issued concurrently.
    async fn fetch_demographics(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<DemographicRow>, MetaError> {
        let per_dimension = try_join_all(
            Dimension::ALL
                .into_iter()
                .map(|dimension| self.demographic_insights(window, dimension)),
        )
        .await?;
        Ok(per_dimension.into_iter().flatten().collect())
    }
}
