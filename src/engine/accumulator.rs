use crate::feed::types::{JobPosting, PageRequest};
use crate::feed::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Fetching,
}

/// How much of the remote listing has been requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCursor {
    pub offset: u64,
    pub page_size: u32,
    /// Offset advance per arrived page. Constant, independent of page length.
    pub step: u32,
    pub in_flight: bool,
}

impl FetchCursor {
    fn request(&self) -> PageRequest {
        PageRequest {
            limit: self.page_size,
            offset: self.offset,
        }
    }
}

/// Owns the fetch cursor and the append-only collection of postings.
///
/// Performs no I/O itself: `initialize` and `request_next_page` hand back the
/// `PageRequest` the caller must dispatch, and the caller reports the outcome
/// through `on_page_arrived` or `on_page_failed`. At most one request is
/// outstanding at any time.
pub struct FeedAccumulator {
    cursor: FetchCursor,
    postings: Vec<JobPosting>,
    pages_loaded: usize,
    last_error: Option<String>,
}

impl FeedAccumulator {
    /// `step` of `None` advances by `page_size`. Zero values are clamped to 1.
    pub fn new(page_size: u32, step: Option<u32>) -> Self {
        let page_size = page_size.max(1);
        Self {
            cursor: FetchCursor {
                offset: 0,
                page_size,
                step: step.unwrap_or(page_size).max(1),
                in_flight: false,
            },
            postings: Vec::new(),
            pages_loaded: 0,
            last_error: None,
        }
    }

    /// Reset to offset 0 with an empty collection and issue the first fetch.
    pub fn initialize(&mut self) -> PageRequest {
        self.cursor.offset = 0;
        self.postings.clear();
        self.pages_loaded = 0;
        self.last_error = None;

        self.cursor.in_flight = true;
        tracing::debug!(limit = self.cursor.page_size, "feed initialized, fetching first page");
        self.cursor.request()
    }

    /// Issue a fetch for the current offset. Returns `None` while a fetch is in flight.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        if self.cursor.in_flight {
            tracing::trace!(offset = self.cursor.offset, "load-more ignored, fetch in flight");
            return None;
        }
        self.cursor.in_flight = true;
        tracing::debug!(
            offset = self.cursor.offset,
            limit = self.cursor.page_size,
            "requesting next page"
        );
        Some(self.cursor.request())
    }

    /// Append a page in arrival order and advance the cursor by the fixed step.
    /// An arrival with no request outstanding is discarded.
    pub fn on_page_arrived(&mut self, page: Vec<JobPosting>) -> &[JobPosting] {
        if !self.cursor.in_flight {
            tracing::warn!(count = page.len(), "discarding page that arrived with no request outstanding");
            return &self.postings;
        }

        let count = page.len();
        self.postings.extend(page);
        self.cursor.in_flight = false;
        self.cursor.offset += u64::from(self.cursor.step);
        self.pages_loaded += 1;
        self.last_error = None;

        tracing::debug!(
            count,
            total = self.postings.len(),
            next_offset = self.cursor.offset,
            "page merged"
        );
        &self.postings
    }

    /// Record a failed fetch. Cursor and collection are left as they were so the
    /// next load-more retries the same offset.
    pub fn on_page_failed(&mut self, error: &FetchError) {
        if !self.cursor.in_flight {
            tracing::warn!(error = %error, "ignoring failure with no request outstanding");
            return;
        }
        tracing::warn!(offset = self.cursor.offset, error = %error, "page fetch failed");
        self.cursor.in_flight = false;
        self.last_error = Some(error.to_string());
    }

    pub fn status(&self) -> FeedStatus {
        if self.cursor.in_flight {
            FeedStatus::Fetching
        } else {
            FeedStatus::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.cursor.in_flight
    }

    pub fn cursor(&self) -> FetchCursor {
        self.cursor
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
