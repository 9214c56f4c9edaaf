pub mod http;
pub mod types;

use async_trait::async_trait;
use types::{JobPosting, PageRequest};

/// Why a page could not be loaded. Every variant is recoverable: the next
/// load-more signal retries the same offset.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("listing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode listing response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// True for network and HTTP status failures, false for malformed bodies.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JobPosting>, FetchError>;
}
