//! Listing endpoint adapter.
//!
//! POSTs `{ "limit": n, "offset": n }` as JSON and expects an object with a
//! `jdList` array back.

use super::types::*;
use super::{FetchError, JobSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.weekday.technology/adhoc/getSampleJdJSON";

/// Parse a listing response body into postings, in response order.
/// Public for unit testing with fixtures.
pub fn parse_jd_list_response(json: &str) -> Result<Vec<JobPosting>, FetchError> {
    let parsed: JdListResponse = serde_json::from_str(json)?;
    tracing::debug!(
        count = parsed.jd_list.len(),
        total = ?parsed.total_count,
        "parsed listing page"
    );
    Ok(parsed.jd_list)
}

pub struct HttpJobSource {
    client: Client,
    endpoint: String,
}

impl HttpJobSource {
    pub fn new(endpoint: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<JobPosting>, FetchError> {
        tracing::debug!(limit = request.limit, offset = request.offset, "requesting listing page");

        let resp = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        parse_jd_list_response(&text)
    }
}
