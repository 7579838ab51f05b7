use std::collections::BTreeSet;

use adweekly_report::{ReportDocument, ReportStore, StoreReceipt, SyncAction, SyncPlan};
use chrono::NaiveDate;

use crate::blocks::page_children;
use crate::client::NotionClient;
use crate::error::NotionError;
use crate::properties::{page_properties, week_start};

impl ReportStore for NotionClient {
    type Error = NotionError;

    /// Week starts of every page in the database. Pages without a readable
    /// `Week` date are skipped.
    async fn existing_week_keys(&self) -> Result<BTreeSet<NaiveDate>, NotionError> {
        let pages = self.query_database(None).await?;
        let mut keys = BTreeSet::new();
        for page in &pages {
            match week_start(&page.properties) {
                Some(start) => {
                    keys.insert(start);
                }
                None => tracing::warn!(page_id = %page.id, "report page has no readable Week date"),
            }
        }
        tracing::debug!(pages = pages.len(), keys = keys.len(), "loaded existing week keys");
        Ok(keys)
    }

    async fn apply(
        &self,
        plan: &SyncPlan,
        document: &ReportDocument,
    ) -> Result<StoreReceipt, NotionError> {
        let properties = page_properties(document);
        let children = page_children(document);

        let page = match plan.action {
            SyncAction::Create => self.create_page(&properties, &children).await?,
            SyncAction::Update => {
                let existing = self
                    .find_page_by_week(plan.key)
                    .await?
                    .ok_or(NotionError::EntryNotFound {
                        week_start: plan.key,
                    })?;
                let updated = self.update_page_properties(&existing.id, &properties).await?;
                self.replace_children(&existing.id, &children).await?;
                updated
            }
        };

        tracing::info!(
            action = %plan.action,
            week_start = %plan.key,
            page_id = %page.id,
            blocks = children.len(),
            "report page written"
        );
        Ok(StoreReceipt {
            entry_id: page.id,
            url: page.url,
        })
    }
}
