use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by the Notion client.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `code` is Notion's machine-readable error code.
    #[error("Notion API error (HTTP {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An update was planned but no page carries the week's `Week` date.
    #[error("no report page for week starting {week_start} to update")]
    EntryNotFound { week_start: NaiveDate },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl NotionError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, NotionError::Api { status: 429, .. })
    }
}
