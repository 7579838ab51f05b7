use thiserror::Error;

/// Errors returned by the insights client.
#[derive(Debug, Error)]
pub enum MetaError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Graph API answered with an error envelope or a non-2xx status.
    #[error("Graph API error (HTTP {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A row carried a value that does not convert into a counter or date.
    #[error("normalization error for {field} = '{value}': {reason}")]
    Normalization {
        field: String,
        value: String,
        reason: String,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Graph API error codes signalling throttling.
const THROTTLE_CODES: [i64; 4] = [4, 17, 32, 613];

impl MetaError {
    /// True for throttling responses, by HTTP status or Graph error code.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            MetaError::Api { status, code, .. } => {
                *status == 429 || code.is_some_and(|c| THROTTLE_CODES.contains(&c))
            }
            _ => false,
        }
    }
}
