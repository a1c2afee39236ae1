//! Feed prefetcher
//!
//! Keeps a small rolling buffer of random articles. The buffer itself is a
//! plain state machine: it decides *when* a refill is needed and hands out a
//! [`RefillTicket`]; whoever holds the ticket performs the fetch (inline via
//! [`ensure_buffer`], or on the TUI's async worker) and reports back with
//! [`FeedBuffer::finish_refill`].

use crate::api::ApiResult;
use crate::api::wikipedia::WikipediaClient;
use crate::models::Article;

/// Maximum number of unconsumed articles held
pub const MAX_BUFFERED: usize = 5;

/// A consume that leaves this many articles or fewer triggers a refill
pub const REFILL_THRESHOLD: usize = 3;

/// Something that can produce a batch of random articles
#[allow(async_fn_in_trait)]
pub trait ArticleSource {
    /// Fetch one batch, in arrival order
    async fn fetch_batch(&self) -> ApiResult<Vec<Article>>;
}

impl ArticleSource for WikipediaClient {
    async fn fetch_batch(&self) -> ApiResult<Vec<Article>> {
        self.random_batch().await
    }
}

/// Permission to run one refill.
///
/// Tickets from before a [`FeedBuffer::reset`] are stale and their results
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefillTicket {
    generation: u64,
}

/// The in-memory queue of not-yet-shown articles
#[derive(Debug, Default)]
pub struct FeedBuffer {
    articles: Vec<Article>,
    refill_in_flight: bool,
    last_error: Option<String>,
    generation: u64,
}

impl FeedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered articles, front first
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// The article on top of the deck
    pub fn current(&self) -> Option<&Article> {
        self.articles.first()
    }

    /// Number of buffered articles
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Whether a refill has been handed out and not yet finished
    pub const fn is_refilling(&self) -> bool {
        self.refill_in_flight
    }

    /// Message from the last failed refill, if the latest attempt failed
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Bumped on every reset; work tagged with an older value is stale
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a refill if there is room and none is running
    pub fn begin_refill(&mut self) -> Option<RefillTicket> {
        if self.refill_in_flight || self.articles.len() >= MAX_BUFFERED {
            return None;
        }
        self.refill_in_flight = true;
        Some(RefillTicket {
            generation: self.generation,
        })
    }

    /// Apply the outcome of a refill. Returns how many articles were appended.
    ///
    /// Articles are appended in arrival order until the buffer is full; the
    /// rest of the batch is discarded. On error the buffer is left as is and
    /// the message is kept for display. No retry is scheduled.
    pub fn finish_refill(&mut self, ticket: RefillTicket, result: ApiResult<Vec<Article>>) -> usize {
        if ticket.generation != self.generation {
            tracing::debug!("Dropping refill from before the last reset");
            return 0;
        }
        self.refill_in_flight = false;

        match result {
            Ok(batch) => {
                self.last_error = None;
                let room = MAX_BUFFERED.saturating_sub(self.articles.len());
                let received = batch.len();
                self.articles.extend(batch.into_iter().take(room));
                let appended = received.min(room);
                tracing::debug!(
                    "Refill appended {appended} of {received} articles ({} buffered)",
                    self.articles.len()
                );
                appended
            }
            Err(e) => {
                tracing::warn!("Article refill failed: {e}");
                self.last_error = Some(format!("Failed to load articles: {e}"));
                0
            }
        }
    }

    /// Remove the article with `id`.
    ///
    /// Returns a ticket when the buffer has dropped to the refill threshold
    /// and no refill is already running.
    pub fn consume(&mut self, id: &str) -> Option<RefillTicket> {
        self.articles.retain(|a| a.id != id);

        if self.articles.len() <= REFILL_THRESHOLD {
            self.begin_refill()
        } else {
            None
        }
    }

    /// Drop everything (e.g. after a language change) and start over
    pub fn reset(&mut self) -> Option<RefillTicket> {
        self.articles.clear();
        self.last_error = None;
        self.refill_in_flight = false;
        self.generation = self.generation.wrapping_add(1);
        self.begin_refill()
    }
}

/// Run a refill that was already handed out
pub async fn run_refill<S: ArticleSource>(
    feed: &mut FeedBuffer,
    ticket: RefillTicket,
    source: &S,
) -> usize {
    let result = source.fetch_batch().await;
    feed.finish_refill(ticket, result)
}

/// Top the buffer up with one fetch if it holds fewer than [`MAX_BUFFERED`]
pub async fn ensure_buffer<S: ArticleSource>(feed: &mut FeedBuffer, source: &S) -> usize {
    match feed.begin_refill() {
        Some(ticket) => run_refill(feed, ticket, source).await,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use std::cell::Cell;

    struct FakeSource {
        calls: Cell<usize>,
        batch_size: usize,
        fail: bool,
    }

    impl FakeSource {
        fn new(batch_size: usize) -> Self {
            Self {
                calls: Cell::new(0),
                batch_size,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }
    }

    impl ArticleSource for FakeSource {
        async fn fetch_batch(&self) -> ApiResult<Vec<Article>> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail {
                return Err(ApiError::NoResult);
            }
            Ok((0..self.batch_size)
                .map(|i| {
                    let id = format!("{call}-{i}");
                    Article::new(id.clone(), format!("Title {id}"), "", None)
                })
                .collect())
        }
    }

    fn ids(feed: &FeedBuffer) -> Vec<&str> {
        feed.articles().iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fill_caps_at_max_and_keeps_order() {
        let source = FakeSource::new(10);
        let mut feed = FeedBuffer::new();

        let appended = ensure_buffer(&mut feed, &source).await;

        assert_eq!(appended, MAX_BUFFERED);
        assert_eq!(ids(&feed), ["0-0", "0-1", "0-2", "0-3", "0-4"]);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_full_buffer_does_not_fetch() {
        let source = FakeSource::new(10);
        let mut feed = FeedBuffer::new();
        ensure_buffer(&mut feed, &source).await;

        assert_eq!(ensure_buffer(&mut feed, &source).await, 0);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_consume_triggers_exactly_one_refill_at_threshold() {
        let source = FakeSource::new(10);
        let mut feed = FeedBuffer::new();
        ensure_buffer(&mut feed, &source).await;

        // 5 -> 4: above threshold
        assert!(feed.consume("0-0").is_none());
        assert_eq!(feed.len(), 4);

        // 4 -> 3: at threshold, one refill
        let ticket = feed.consume("0-1").expect("refill expected");
        assert!(feed.is_refilling());

        // 3 -> 2 while the refill is still running: no second request
        assert!(feed.consume("0-2").is_none());

        run_refill(&mut feed, ticket, &source).await;
        assert_eq!(source.calls.get(), 2);
        assert_eq!(feed.len(), MAX_BUFFERED);
        assert_eq!(ids(&feed)[..2], ["0-3", "0-4"]);
        assert_eq!(ids(&feed)[2], "1-0");
    }

    #[tokio::test]
    async fn test_failure_leaves_buffer_and_records_message() {
        let good = FakeSource::new(4);
        let bad = FakeSource::failing();
        let mut feed = FeedBuffer::new();
        ensure_buffer(&mut feed, &good).await;
        assert_eq!(feed.len(), 4);

        let appended = ensure_buffer(&mut feed, &bad).await;

        assert_eq!(appended, 0);
        assert_eq!(feed.len(), 4);
        assert!(feed.last_error().unwrap().starts_with("Failed to load articles"));
        assert!(!feed.is_refilling());
        assert_eq!(bad.calls.get(), 1);

        // The next successful refill clears the message
        ensure_buffer(&mut feed, &good).await;
        assert!(feed.last_error().is_none());
        assert_eq!(feed.len(), MAX_BUFFERED);
    }

    #[tokio::test]
    async fn test_reset_discards_stale_refill() {
        let source = FakeSource::new(10);
        let mut feed = FeedBuffer::new();

        let stale = feed.begin_refill().unwrap();
        let fresh = feed.reset().expect("reset starts a new refill");

        assert_eq!(run_refill(&mut feed, stale, &source).await, 0);
        assert!(feed.is_empty());
        assert!(feed.is_refilling());

        assert_eq!(run_refill(&mut feed, fresh, &source).await, MAX_BUFFERED);
        assert!(!feed.is_refilling());
    }

    #[test]
    fn test_consume_unknown_id_above_threshold_is_noop() {
        let mut feed = FeedBuffer::new();
        let ticket = feed.begin_refill().unwrap();
        let batch = (0..5)
            .map(|i| Article::new(i.to_string(), "t", "", None))
            .collect();
        feed.finish_refill(ticket, Ok(batch));

        assert!(feed.consume("missing").is_none());
        assert_eq!(feed.len(), 5);
    }
}
