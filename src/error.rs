use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single fetch against the listing source. A fetch either
/// yields the whole page or one of these, never a partial batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to search API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search API returned status {0}")]
    Status(StatusCode),

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search API reported an error: {0}")]
    Api(String),
}

/// Failure to hand a notification to the chat backend
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request to chat backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat backend rejected message with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("chat backend refused credential (status {0})")]
    InvalidCredential(StatusCode),
}
