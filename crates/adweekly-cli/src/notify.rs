//! Slack incoming-webhook notifier.

use std::time::Duration;

use adweekly_report::{Notifier, RunSignal};
use reqwest::Client;
use serde_json::{json, Value};

const SUCCESS_COLOR: &str = "#36A64F";
const FAILURE_COLOR: &str = "#E01E5A";

pub(crate) struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub(crate) fn new(webhook_url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
        })
    }
}

impl Notifier for SlackNotifier {
    type Error = reqwest::Error;

    async fn notify(&self, signal: &RunSignal) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.webhook_url)
            .json(&payload(signal))
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!(success = signal.is_success(), "Slack notification sent");
        Ok(())
    }
}

/// One colored attachment with a markdown section.
pub(crate) fn payload(signal: &RunSignal) -> Value {
    let (color, icon) = if signal.is_success() {
        (SUCCESS_COLOR, ":white_check_mark:")
    } else {
        (FAILURE_COLOR, ":x:")
    };
    json!({
        "attachments": [{
            "color": color,
            "blocks": [{
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("{icon} *Weekly Ad Report*\n{}", signal.message()),
                }
            }]
        }]
    })
}
