use futures::future::join_all;
use hn_core::config::MAX_CONCURRENT_FETCHES;
use hn_core::{filter_articles, Article, ArticleMetadata, Error, GatewayResolver, MetadataSnapshot, MetadataStore, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::fetch::DocumentSource;
use crate::logging::Logger;
use crate::scrapers::{HackerNoonScraper, Scraper};

/// Fetches article pages, extracts their metadata and caches the result per
/// transaction id.
pub struct MetadataManager {
    store: Arc<dyn MetadataStore>,
    source: Arc<dyn DocumentSource>,
    scraper: Arc<dyn Scraper>,
    resolver: GatewayResolver,
    max_concurrent: usize,
}

impl MetadataManager {
    pub fn new(store: Arc<dyn MetadataStore>, source: Arc<dyn DocumentSource>, resolver: GatewayResolver) -> Self {
        Self {
            store,
            source,
            scraper: Arc::new(HackerNoonScraper::new()),
            resolver,
            max_concurrent: MAX_CONCURRENT_FETCHES,
        }
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn Scraper>) -> Self {
        self.scraper = scraper;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn resolver(&self) -> &GatewayResolver {
        &self.resolver
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ArticleMetadata>> {
        self.store.get(id).await
    }

    pub async fn entries(&self) -> MetadataSnapshot {
        self.store.entries().await
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }

    /// Cached metadata, or fetch + extract + cache. Cancellation and failures
    /// surface as errors and leave the cache untouched.
    pub async fn try_fetch(&self, id: &str, cancel: &CancellationToken) -> Result<Arc<ArticleMetadata>> {
        if let Some(cached) = self.store.get(id).await {
            return Ok(cached);
        }

        let url = self.resolver.resolve(id);
        let html = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            html = self.source.fetch_document(&url) => html?,
        };

        let metadata = Arc::new(self.scraper.extract(&html));
        tracing::debug!("Extracted {} metadata for {} ({} bytes)", self.scraper.source(), id, html.len());
        self.store.insert(id, metadata.clone()).await;
        Ok(metadata)
    }

    /// Like `try_fetch`, but logs failures and returns `None`.
    pub async fn fetch_and_cache(&self, id: &str, cancel: &CancellationToken) -> Option<Arc<ArticleMetadata>> {
        let logger = Logger::for_transaction(id);
        match self.try_fetch(id, cancel).await {
            Ok(metadata) => Some(metadata),
            Err(Error::Cancelled) => {
                logger.debug("Metadata fetch cancelled");
                None
            }
            Err(e) => {
                logger.error(&format!("Failed to fetch metadata: {}", e));
                None
            }
        }
    }

    /// Fetch metadata for many ids, `max_concurrent` at a time. Each batch runs
    /// to completion before the next one starts.
    pub async fn fetch_many(&self, ids: &[String]) -> HashMap<String, Arc<ArticleMetadata>> {
        let cancel = CancellationToken::new();
        let mut results = HashMap::new();

        for batch in ids.chunks(self.max_concurrent) {
            let fetches = batch.iter().map(|id| {
                let cancel = &cancel;
                async move { (id, self.fetch_and_cache(id, cancel).await) }
            });
            for (id, metadata) in join_all(fetches).await {
                if let Some(metadata) = metadata {
                    results.insert(id.clone(), metadata);
                }
            }
        }

        tracing::info!("✨ Fetched metadata for {}/{} articles", results.len(), ids.len());
        results
    }

    /// Filter articles by `term`, consulting whatever metadata is cached right now.
    pub async fn search(&self, articles: &[Article], term: &str) -> Vec<Article> {
        let snapshot = self.entries().await;
        filter_articles(articles, term, &snapshot)
    }
}
