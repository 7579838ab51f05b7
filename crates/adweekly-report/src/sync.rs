//! Create-or-update decision for the external document store.
//!
//! The store key is the week's start date and nothing else, so re-running a
//! week always lands on the same remote entry however the report content
//! changed. The key set is a point-in-time snapshot: two runs racing on the
//! same week can both decide to create.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::WeeklyReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncAction {
    Create,
    Update,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncAction::Create => f.write_str("create"),
            SyncAction::Update => f.write_str("update"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub action: SyncAction,
    pub key: NaiveDate,
}

#[must_use]
pub fn plan(existing_keys: &BTreeSet<NaiveDate>, report: &WeeklyReport) -> SyncPlan {
    let key = report.week_start;
    let action = if existing_keys.contains(&key) {
        SyncAction::Update
    } else {
        SyncAction::Create
    };
    tracing::debug!(%key, %action, known = existing_keys.len(), "planned store sync");
    SyncPlan { action, key }
}
