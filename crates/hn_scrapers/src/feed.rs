use hn_core::{Article, Error, FeedConfig, Result, TransactionPage};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::graphql::TransactionSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    Exhausted,
    /// The initial load failed; `load` may be called again.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No cursor, no more pages, or a request was already in flight.
    Skipped,
    Appended(usize),
    /// The page request failed; articles, cursor and `has_more` are unchanged.
    Failed(String),
}

#[derive(Debug)]
struct FeedState {
    articles: Vec<Article>,
    cursor: Option<String>,
    has_more: bool,
    status: FeedStatus,
}

impl FeedState {
    fn settled_status(&self) -> FeedStatus {
        if self.has_more {
            FeedStatus::Loaded
        } else {
            FeedStatus::Exhausted
        }
    }

    fn apply(&mut self, page: &TransactionPage) {
        self.cursor = page.last_cursor();
        self.has_more = page.page_info.has_next_page;
        self.status = self.settled_status();
    }
}

/// Paginated view over every transaction published by one wallet, newest first.
pub struct ArticleFeed {
    source: Arc<dyn TransactionSource>,
    owner: String,
    page_size: usize,
    state: RwLock<FeedState>,
    in_flight: AtomicBool,
    generation: AtomicU64,
}

/// Owns the in-flight flag for one request. Dropping it, including when the
/// caller drops the pending future, releases the flag and rolls a stuck
/// `Loading` status back, unless a newer `load` took over in the meantime.
struct InFlight<'a> {
    feed: &'a ArticleFeed,
    generation: u64,
    previous: FeedStatus,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.feed.generation.load(Ordering::SeqCst) != self.generation {
            return;
        }
        if let Ok(mut state) = self.feed.state.try_write() {
            if state.status == FeedStatus::Loading {
                state.status = match std::mem::replace(&mut self.previous, FeedStatus::Idle) {
                    FeedStatus::Loading if state.cursor.is_some() => state.settled_status(),
                    FeedStatus::Loading => FeedStatus::Idle,
                    previous => previous,
                };
            }
        }
        self.feed.in_flight.store(false, Ordering::SeqCst);
    }
}

fn transform(page: &TransactionPage) -> Vec<Article> {
    page.edges.iter().map(|edge| Article::from(&edge.node)).collect()
}

impl ArticleFeed {
    pub fn new(source: Arc<dyn TransactionSource>, owner: impl Into<String>, page_size: usize) -> Self {
        Self {
            source,
            owner: owner.into(),
            page_size: page_size.max(1),
            state: RwLock::new(FeedState {
                articles: Vec::new(),
                cursor: None,
                has_more: true,
                status: FeedStatus::Idle,
            }),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config(source: Arc<dyn TransactionSource>, config: &FeedConfig) -> Self {
        Self::new(source, config.owner.clone(), config.page_size)
    }

    /// Fetch the first page and replace whatever was loaded before.
    ///
    /// Returns `Error::Cancelled` when a newer `load` started before this one
    /// finished; the newer call owns the result.
    pub async fn load(&self) -> Result<usize> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut guard = InFlight {
            feed: self,
            generation,
            previous: FeedStatus::Idle,
        };
        self.in_flight.store(true, Ordering::SeqCst);
        {
            let mut state = self.state.write().await;
            guard.previous = std::mem::replace(&mut state.status, FeedStatus::Loading);
        }

        let result = self.source.fetch_page(&self.owner, None, self.page_size).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("A newer load superseded this one, dropping its result");
            return Err(Error::Cancelled);
        }

        match result {
            Ok(page) => {
                state.articles = transform(&page);
                state.apply(&page);
                info!("📰 Loaded {} articles (more: {})", state.articles.len(), state.has_more);
                Ok(state.articles.len())
            }
            Err(e) => {
                state.status = FeedStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the page after the stored cursor and append it.
    pub async fn load_more(&self) -> LoadOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Page request already in flight, skipping");
            return LoadOutcome::Skipped;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let mut guard = InFlight {
            feed: self,
            generation,
            previous: FeedStatus::Idle,
        };
        let cursor = {
            let mut state = self.state.write().await;
            let cursor = match state.cursor.clone() {
                Some(cursor) if state.has_more => cursor,
                _ => return LoadOutcome::Skipped,
            };
            guard.previous = std::mem::replace(&mut state.status, FeedStatus::Loading);
            cursor
        };

        let result = self
            .source
            .fetch_page(&self.owner, Some(&cursor), self.page_size)
            .await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Feed was reloaded while fetching the next page, dropping it");
            return LoadOutcome::Skipped;
        }

        match result {
            Ok(page) => {
                let mut articles = transform(&page);
                let count = articles.len();
                state.articles.append(&mut articles);
                state.apply(&page);
                info!("📰 Appended {} articles, {} total", count, state.articles.len());
                LoadOutcome::Appended(count)
            }
            Err(e) => {
                warn!("Error loading more articles: {}", e);
                state.status = state.settled_status();
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Keep loading pages until the feed is exhausted, a page fails, or
    /// `max_pages` pages (including the first) are loaded. Loads the first page
    /// if nothing was loaded yet.
    pub async fn load_all(&self, max_pages: usize) -> Result<usize> {
        let mut pages = 0;
        if matches!(self.status().await, FeedStatus::Idle | FeedStatus::Failed(_)) {
            self.load().await?;
            pages += 1;
        }

        while pages < max_pages && self.has_more().await {
            match self.load_more().await {
                LoadOutcome::Appended(_) => pages += 1,
                LoadOutcome::Skipped | LoadOutcome::Failed(_) => break,
            }
        }
        Ok(pages)
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.state.read().await.articles.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more
    }

    pub async fn cursor(&self) -> Option<String> {
        self.state.read().await.cursor.clone()
    }

    pub async fn status(&self) -> FeedStatus {
        self.state.read().await.status.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}
