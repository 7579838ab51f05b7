//! HTTP client for the Graph API insights edge.
//!
//! Every request carries the access token as a query parameter, follows
//! `paging.next` cursors until exhausted, and turns the Graph error envelope
//! into [`MetaError::Api`]. Transient failures are retried per page.

use std::time::Duration;

use adweekly_core::{AppConfig, DemographicRow, Dimension, InsightRow, ReportWindow};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::MetaError;
use crate::normalize::{breakdown_row, campaign_row, normalize_account_id};
use crate::retry::{is_retriable, retry_with_backoff};
use crate::types::{BreakdownInsight, CampaignInsight, ErrorEnvelope, InsightsPage};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/";

/// Hard stop for cursor pagination on a single query.
pub const MAX_PAGES: usize = 100;

const CAMPAIGN_FIELDS: &str =
    "campaign_id,campaign_name,spend,impressions,clicks,actions,action_values";
const BREAKDOWN_FIELDS: &str = "spend,impressions,clicks";
const CAMPAIGN_PAGE_LIMIT: &str = "500";
const BREAKDOWN_PAGE_LIMIT: &str = "100";

/// Connection settings for [`MetaClient`].
#[derive(Clone)]
pub struct MetaClientConfig {
    pub access_token: String,
    pub ad_account_id: String,
    pub api_version: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl MetaClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            access_token: config.meta_access_token.clone(),
            ad_account_id: config.meta_ad_account_id.clone(),
            api_version: config.meta_api_version.clone(),
            base_url: config.meta_graph_base_url.clone(),
            timeout_secs: config.http_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for MetaClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaClientConfig")
            .field("access_token", &"[redacted]")
            .field("ad_account_id", &self.ad_account_id)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

/// Client for one ad account's insights.
pub struct MetaClient {
    client: Client,
    access_token: String,
    insights_url: Url,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl MetaClient {
    /// # Errors
    ///
    /// Returns [`MetaError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`MetaError::InvalidConfig`] for an unusable base URL, version or
    /// account id.
    pub fn new(config: &MetaClientConfig) -> Result<Self, MetaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adweekly/0.1 (weekly-report)")
            .build()?;

        let version = config.api_version.trim().trim_matches('/');
        if version.is_empty() {
            return Err(MetaError::InvalidConfig("API version is empty".to_string()));
        }
        let account = normalize_account_id(&config.ad_account_id);
        if account == "act_" {
            return Err(MetaError::InvalidConfig("ad account id is empty".to_string()));
        }

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let insights_url = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("{version}/{account}/insights")))
            .map_err(|e| {
                MetaError::InvalidConfig(format!("invalid base URL '{}': {e}", config.base_url))
            })?;

        Ok(Self {
            client,
            access_token: config.access_token.clone(),
            insights_url,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`MetaClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, MetaError> {
        Self::new(&MetaClientConfig::from_app_config(config))
    }

    /// Daily campaign-level rows for every day in `window`.
    ///
    /// # Errors
    ///
    /// Returns the first transport, API, decoding or normalization error.
    pub async fn campaign_insights(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<InsightRow>, MetaError> {
        let url = self.build_url(
            window,
            &[
                ("level", "campaign"),
                ("fields", CAMPAIGN_FIELDS),
                ("time_increment", "1"),
                ("limit", CAMPAIGN_PAGE_LIMIT),
            ],
        );
        let raw: Vec<CampaignInsight> = self.fetch_all_pages(url, "campaign insights").await?;
        let rows = raw
            .into_iter()
            .map(campaign_row)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(rows = rows.len(), window = %window, "fetched campaign insights");
        Ok(rows)
    }

    /// Account-level rows split by `dimension` over the whole window.
    ///
    /// # Errors
    ///
    /// Returns the first transport, API, decoding or normalization error.
    pub async fn demographic_insights(
        &self,
        window: &ReportWindow,
        dimension: Dimension,
    ) -> Result<Vec<DemographicRow>, MetaError> {
        let url = self.build_url(
            window,
            &[
                ("level", "account"),
                ("fields", BREAKDOWN_FIELDS),
                ("breakdowns", dimension.as_str()),
                ("limit", BREAKDOWN_PAGE_LIMIT),
            ],
        );
        let context = format!("{dimension} breakdown");
        let raw: Vec<BreakdownInsight> = self.fetch_all_pages(url, &context).await?;
        let rows = raw
            .into_iter()
            .map(|r| breakdown_row(dimension, r))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(rows = rows.len(), %dimension, "fetched demographic breakdown");
        Ok(rows)
    }

    fn build_url(&self, window: &ReportWindow, extra: &[(&str, &str)]) -> Url {
        let time_range = serde_json::json!({
            "since": window.start().to_string(),
            "until": window.end().to_string(),
        })
        .to_string();

        let mut url = self.insights_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("time_range", &time_range);
            pairs.append_pair("access_token", &self.access_token);
        }
        url
    }

    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        first: Url,
        context: &str,
    ) -> Result<Vec<T>, MetaError> {
        let mut items = Vec::new();
        let mut next = Some(first);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if pages >= MAX_PAGES {
                return Err(MetaError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }
            pages += 1;

            let page: InsightsPage<T> = retry_with_backoff(
                self.max_retries,
                self.retry_backoff_base_ms,
                is_retriable,
                || self.request_page(&url, context),
            )
            .await?;
            tracing::debug!(context, page = pages, rows = page.data.len(), "fetched insights page");

            items.extend(page.data);
            next = match page.paging.and_then(|p| p.next) {
                Some(raw) => Some(Url::parse(&raw).map_err(|e| {
                    MetaError::InvalidConfig(format!("invalid paging cursor URL: {e}"))
                })?),
                None => None,
            };
        }

        Ok(items)
    }

    /// Sends a GET request and parses either the page or the error envelope.
    ///
    /// Error contexts carry the URL path only so the token never reaches logs.
    async fn request_page<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<InsightsPage<T>, MetaError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| MetaError::Deserialize {
            context: format!("{context} ({})", url.path()),
            source: e,
        })
    }
}

/// Maps a non-2xx body to [`MetaError::Api`], tolerating non-JSON bodies.
fn api_error(status: u16, body: &str) -> MetaError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => MetaError::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => MetaError::Api {
            status,
            code: None,
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
