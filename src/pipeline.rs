use crate::config::Config;
use crate::engine::{filter, CriteriaSet, FeedAccumulator};
use crate::feed::types::{JobPosting, PageRequest};
use crate::feed::{FetchError, JobSource};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Inputs the pipeline accepts from the outside world.
#[derive(Debug, Clone)]
pub enum FeedCommand {
    /// Opaque "advance the page" signal (scroll proximity, key press, timer).
    LoadMore,
    /// Full replacement of the active criteria.
    SetCriteria(CriteriaSet),
    Shutdown,
}

/// What the renderer sees: the filtered postings plus loading state.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    pub postings: Vec<JobPosting>,
    pub loading: bool,
    /// Postings accumulated so far, before filtering.
    pub accumulated: usize,
    pub offset: u64,
    pub last_error: Option<String>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl FeedView {
    /// Nothing matches and nothing more is on the way.
    pub fn shows_no_results(&self) -> bool {
        self.postings.is_empty() && !self.loading
    }
}

type FetchOutcome = Result<Vec<JobPosting>, FetchError>;

/// Wires the accumulator and the filter together. Owns all session state;
/// the only concurrent piece is the single outstanding fetch task.
pub struct FeedPipeline {
    source: Arc<dyn JobSource>,
    accumulator: FeedAccumulator,
    criteria: CriteriaSet,
    view_tx: watch::Sender<FeedView>,
}

impl FeedPipeline {
    pub fn new(
        source: Arc<dyn JobSource>,
        accumulator: FeedAccumulator,
        criteria: CriteriaSet,
    ) -> (Self, watch::Receiver<FeedView>) {
        let (view_tx, view_rx) = watch::channel(FeedView::default());
        let pipeline = Self {
            source,
            accumulator,
            criteria,
            view_tx,
        };
        (pipeline, view_rx)
    }

    pub fn from_config(
        source: Arc<dyn JobSource>,
        config: &Config,
    ) -> (Self, watch::Receiver<FeedView>) {
        let accumulator = FeedAccumulator::new(config.source.page_size, config.source.offset_step);
        Self::new(source, accumulator, config.criteria.clone())
    }

    /// Recompute the filtered view from the current collection and criteria.
    pub fn view(&self) -> FeedView {
        let postings = filter(self.accumulator.postings(), &self.criteria)
            .into_iter()
            .cloned()
            .collect();
        FeedView {
            postings,
            loading: self.accumulator.is_loading(),
            accumulated: self.accumulator.postings().len(),
            offset: self.accumulator.cursor().offset,
            last_error: self.accumulator.last_error().map(str::to_string),
            updated_at: Some(chrono::Utc::now()),
        }
    }

    fn publish(&self) {
        let view = self.view();
        tracing::trace!(
            shown = view.postings.len(),
            accumulated = view.accumulated,
            loading = view.loading,
            "publishing feed view"
        );
        self.view_tx.send_replace(view);
    }

    fn dispatch(&self, request: PageRequest, done_tx: &mpsc::Sender<FetchOutcome>) {
        let source = Arc::clone(&self.source);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_page(request).await;
            // Receiver is gone only after shutdown; the result is dropped with it.
            let _ = done_tx.send(outcome).await;
        });
    }

    /// Fetch the first page, then serve commands and fetch completions until
    /// `Shutdown` arrives or every command sender is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<FeedCommand>) {
        let (done_tx, mut done_rx) = mpsc::channel::<FetchOutcome>(1);

        let first = self.accumulator.initialize();
        self.dispatch(first, &done_tx);
        self.publish();

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(FeedCommand::LoadMore) => {
                        if let Some(request) = self.accumulator.request_next_page() {
                            self.dispatch(request, &done_tx);
                            self.publish();
                        }
                    }
                    Some(FeedCommand::SetCriteria(criteria)) => {
                        tracing::debug!(?criteria, "criteria replaced");
                        self.criteria = criteria;
                        self.publish();
                    }
                    Some(FeedCommand::Shutdown) | None => break,
                },
                Some(outcome) = done_rx.recv() => {
                    match outcome {
                        Ok(page) => {
                            self.accumulator.on_page_arrived(page);
                        }
                        Err(e) => self.accumulator.on_page_failed(&e),
                    }
                    self.publish();
                }
            }
        }

        tracing::debug!(
            accumulated = self.accumulator.postings().len(),
            pages = self.accumulator.pages_loaded(),
            "feed pipeline stopped"
        );
    }
}
