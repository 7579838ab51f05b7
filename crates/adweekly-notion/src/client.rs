//! HTTP client for the Notion REST API.
//!
//! Covers the calls the weekly report needs: database queries, page creation
//! and property updates, child block replacement, and database bootstrap.

use std::time::Duration;

use adweekly_core::AppConfig;
use chrono::NaiveDate;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::NotionError;
use crate::properties::{database_schema, week_filter, week_start};
use crate::retry::{is_rejected_before_write, is_retriable, retry_with_backoff};
use crate::types::{BlockObject, DatabaseObject, ErrorBody, ListResponse, PageObject};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/";
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion accepts at most this many children per create or append call.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Hard stop for cursor pagination.
pub const MAX_PAGES: usize = 100;

const PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct NotionClientConfig {
    pub token: String,
    pub database_id: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl NotionClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            token: config.notion_token.clone(),
            database_id: config.notion_database_id.clone(),
            base_url: config.notion_base_url.clone(),
            timeout_secs: config.http_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for NotionClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClientConfig")
            .field("token", &"[redacted]")
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}

/// A database created by [`NotionClient::create_database`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseInfo {
    pub id: String,
    pub url: Option<String>,
}

/// Client bound to one report database.
pub struct NotionClient {
    client: Client,
    token: String,
    database_id: String,
    base_url: Url,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl NotionClient {
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`NotionError::InvalidConfig`] for an unusable base URL.
    pub fn new(config: &NotionClientConfig) -> Result<Self, NotionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adweekly/0.1 (weekly-report)")
            .build()?;

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            NotionError::InvalidConfig(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client,
            token: config.token.clone(),
            database_id: config.database_id.trim().to_string(),
            base_url,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    /// # Errors
    ///
    /// See [`NotionClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NotionError> {
        Self::new(&NotionClientConfig::from_app_config(config))
    }

    /// Every page in the database matching `filter`, across all result pages.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decoding errors, or
    /// [`NotionError::PaginationLimit`] past [`MAX_PAGES`].
    pub async fn query_database(&self, filter: Option<Value>) -> Result<Vec<PageObject>, NotionError> {
        let path = format!("v1/databases/{}/query", self.database_id);
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(f) = &filter {
                body["filter"] = f.clone();
            }
            if let Some(c) = &cursor {
                body["start_cursor"] = json!(c);
            }

            let list: ListResponse<PageObject> =
                self.send(Method::POST, &path, Some(&body), is_retriable).await?;
            pages.extend(list.results);

            match list.next_cursor.filter(|_| list.has_more) {
                Some(next) => cursor = Some(next),
                None => return Ok(pages),
            }
        }

        Err(NotionError::PaginationLimit {
            max_pages: MAX_PAGES,
        })
    }

    /// The page keyed by `key`, matched on the same `Week` start that
    /// [`week_start`] reads for the existing-key snapshot.
    ///
    /// # Errors
    ///
    /// See [`NotionClient::query_database`].
    pub async fn find_page_by_week(&self, key: NaiveDate) -> Result<Option<PageObject>, NotionError> {
        let matches: Vec<PageObject> = self
            .query_database(Some(week_filter(key)))
            .await?
            .into_iter()
            .filter(|page| week_start(&page.properties) == Some(key))
            .collect();
        if matches.len() > 1 {
            tracing::warn!(
                week_start = %key,
                count = matches.len(),
                "several report pages share a week, updating the first"
            );
        }
        Ok(matches.into_iter().next())
    }

    /// Creates a database row with `properties` and the page body.
    ///
    /// Creation is retried only on explicit rate limiting; a timed-out create
    /// may already exist and is surfaced instead of repeated.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decoding errors.
    pub async fn create_page(
        &self,
        properties: &Value,
        children: &[Value],
    ) -> Result<PageObject, NotionError> {
        let split = children.len().min(MAX_CHILDREN_PER_REQUEST);
        let (first, rest) = children.split_at(split);
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": properties,
            "children": first,
        });

        let page: PageObject = self
            .send(Method::POST, "v1/pages", Some(&body), is_rejected_before_write)
            .await?;
        self.append_children(&page.id, rest).await?;
        Ok(page)
    }

    /// # Errors
    ///
    /// Returns transport, API and decoding errors.
    pub async fn update_page_properties(
        &self,
        page_id: &str,
        properties: &Value,
    ) -> Result<PageObject, NotionError> {
        let body = json!({ "properties": properties });
        self.send(Method::PATCH, &format!("v1/pages/{page_id}"), Some(&body), is_retriable)
            .await
    }

    /// Deletes every child block of `page_id`, then appends `children`.
    ///
    /// # Errors
    ///
    /// Returns the first failing call; the page body may then be partial
    /// until the next successful run rewrites it.
    pub async fn replace_children(&self, page_id: &str, children: &[Value]) -> Result<(), NotionError> {
        let existing = self.list_children(page_id).await?;
        tracing::debug!(page_id, removed = existing.len(), added = children.len(), "replacing page body");
        for block in &existing {
            let _: Value = self
                .send(Method::DELETE, &format!("v1/blocks/{}", block.id), None, is_retriable)
                .await?;
        }
        self.append_children(page_id, children).await
    }

    /// # Errors
    ///
    /// Returns transport, API and decoding errors, or
    /// [`NotionError::PaginationLimit`] past [`MAX_PAGES`].
    pub async fn list_children(&self, block_id: &str) -> Result<Vec<BlockObject>, NotionError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut path = format!("v1/blocks/{block_id}/children?page_size={PAGE_SIZE}");
            if let Some(c) = &cursor {
                path.push_str("&start_cursor=");
                path.push_str(c);
            }

            let list: ListResponse<BlockObject> =
                self.send(Method::GET, &path, None, is_retriable).await?;
            blocks.extend(list.results);

            match list.next_cursor.filter(|_| list.has_more) {
                Some(next) => cursor = Some(next),
                None => return Ok(blocks),
            }
        }

        Err(NotionError::PaginationLimit {
            max_pages: MAX_PAGES,
        })
    }

    /// Appends `children` in batches of [`MAX_CHILDREN_PER_REQUEST`].
    ///
    /// # Errors
    ///
    /// Returns transport, API and decoding errors.
    pub async fn append_children(&self, block_id: &str, children: &[Value]) -> Result<(), NotionError> {
        let path = format!("v1/blocks/{block_id}/children");
        for chunk in children.chunks(MAX_CHILDREN_PER_REQUEST) {
            let body = json!({ "children": chunk });
            let _: Value = self
                .send(Method::PATCH, &path, Some(&body), is_rejected_before_write)
                .await?;
        }
        Ok(())
    }

    /// Creates the report database under `parent_page_id`.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decoding errors.
    pub async fn create_database(
        &self,
        parent_page_id: &str,
        title: &str,
        currency: &str,
    ) -> Result<DatabaseInfo, NotionError> {
        let body = json!({
            "parent": { "type": "page_id", "page_id": parent_page_id.trim() },
            "title": [{ "type": "text", "text": { "content": title } }],
            "properties": database_schema(currency),
        });
        let database: DatabaseObject = self
            .send(Method::POST, "v1/databases", Some(&body), is_rejected_before_write)
            .await?;
        tracing::info!(database_id = %database.id, "created report database");
        Ok(DatabaseInfo {
            id: database.id,
            url: database.url,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        retriable: fn(&NotionError) -> bool,
    ) -> Result<T, NotionError> {
        let url = self.base_url.join(path).map_err(|e| {
            NotionError::InvalidConfig(format!("invalid request path '{path}': {e}"))
        })?;

        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, retriable, || {
            self.request_json(method.clone(), &url, body)
        })
        .await
    }

    /// Sends one authenticated request and parses the body or error envelope.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
    ) -> Result<T, NotionError> {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION);
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| NotionError::Deserialize {
            context: format!("{method} {}", url.path()),
            source: e,
        })
    }
}

fn api_error(status: u16, body: &str) -> NotionError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => NotionError::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => NotionError::Api {
            status,
            code: String::new(),
            message: body.chars().take(200).collect(),
        },
    }
}
