//! Wire types for the subset of Notion API responses the adapter reads.

use serde::Deserialize;

/// Paginated list envelope shared by database queries and block children.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct BlockObject {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
