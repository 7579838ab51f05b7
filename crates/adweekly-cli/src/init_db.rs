use adweekly_notion::{NotionClient, NotionClientConfig};
use anyhow::Context;

const TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const RETRY_BACKOFF_BASE_MS: u64 = 1000;

/// Creates the report database and prints the id to configure as
/// `NOTION_DATABASE_ID`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or Notion rejects the call.
pub(crate) async fn run_init_db(
    notion_token: &str,
    parent_page_id: &str,
    notion_base_url: &str,
    title: &str,
    currency: &str,
) -> anyhow::Result<()> {
    let client = NotionClient::new(&NotionClientConfig {
        token: notion_token.to_string(),
        database_id: String::new(),
        base_url: notion_base_url.to_string(),
        timeout_secs: TIMEOUT_SECS,
        max_retries: MAX_RETRIES,
        retry_backoff_base_ms: RETRY_BACKOFF_BASE_MS,
    })
    .context("failed to build Notion client")?;

    let database = client
        .create_database(parent_page_id, title, currency)
        .await
        .context("failed to create report database")?;

    println!("created database {}", database.id);
    if let Some(url) = &database.url {
        println!("url: {url}");
    }
    println!("set NOTION_DATABASE_ID={} before running `adweekly run`", database.id);
    Ok(())
}
