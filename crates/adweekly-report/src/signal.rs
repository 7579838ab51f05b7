use serde::Serialize;

use crate::error::PipelineError;
use crate::pipeline::RunOutcome;

/// Terminal result of a run, handed to whatever notifies humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunSignal {
    Success { report_summary: String },
    Failure { error_kind: String, message: String },
}

impl RunSignal {
    #[must_use]
    pub fn from_result(result: &Result<RunOutcome, PipelineError>) -> Self {
        match result {
            Ok(outcome) => RunSignal::Success {
                report_summary: outcome.summary_line(),
            },
            Err(err) => RunSignal::Failure {
                error_kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, RunSignal::Success { .. })
    }

    /// Single-paragraph text for chat-style notifiers.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            RunSignal::Success { report_summary } => report_summary.clone(),
            RunSignal::Failure {
                error_kind,
                message,
            } => format!("Weekly report failed ({error_kind}): {message}"),
        }
    }
}
