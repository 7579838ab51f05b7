//! Capability seams the pipeline drives. Implementations live in the adapter
//! crates; tests use in-memory fakes.

use std::collections::BTreeSet;

use adweekly_core::{DemographicRow, InsightRow, ReportWindow};
use chrono::NaiveDate;
use serde::Serialize;

use crate::document::ReportDocument;
use crate::signal::RunSignal;
use crate::sync::SyncPlan;

/// Supplies raw rows for a closed date window. Rows may come in any order.
#[allow(async_fn_in_trait)]
pub trait InsightSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_insights(&self, window: &ReportWindow) -> Result<Vec<InsightRow>, Self::Error>;

    async fn fetch_demographics(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<DemographicRow>, Self::Error>;
}

/// Reference to the store entry written by [`ReportStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReceipt {
    pub entry_id: String,
    pub url: Option<String>,
}

/// The external structured store holding one entry per week.
#[allow(async_fn_in_trait)]
pub trait ReportStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Week-start keys of every entry currently in the store.
    async fn existing_week_keys(&self) -> Result<BTreeSet<NaiveDate>, Self::Error>;

    /// Perform the planned create or update with the full document.
    async fn apply(
        &self,
        plan: &SyncPlan,
        document: &ReportDocument,
    ) -> Result<StoreReceipt, Self::Error>;
}

/// Delivers the terminal signal of a run.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn notify(&self, signal: &RunSignal) -> Result<(), Self::Error>;
}
