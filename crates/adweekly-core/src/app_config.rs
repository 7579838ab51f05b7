use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Everything a weekly run needs, resolved once at startup and passed down
/// explicitly. Nothing below the binary reads the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub meta_access_token: String,
    pub meta_ad_account_id: String,
    pub meta_api_version: String,
    pub meta_graph_base_url: String,
    pub notion_token: String,
    pub notion_database_id: String,
    pub notion_parent_page_id: Option<String>,
    pub notion_base_url: String,
    pub slack_webhook_url: Option<String>,
    pub http_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub settings_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("meta_access_token", &"[redacted]")
            .field("meta_ad_account_id", &self.meta_ad_account_id)
            .field("meta_api_version", &self.meta_api_version)
            .field("meta_graph_base_url", &self.meta_graph_base_url)
            .field("notion_token", &"[redacted]")
            .field("notion_database_id", &self.notion_database_id)
            .field("notion_parent_page_id", &self.notion_parent_page_id)
            .field("notion_base_url", &self.notion_base_url)
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("settings_path", &self.settings_path)
            .finish()
    }
}
