use hn_core::ArticleMetadata;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::manager::MetadataManager;

/// Background metadata fetch for one article, started after a short delay.
///
/// The delay keeps a fast scroll past a card from triggering a request.
/// Dropping the task cancels it; a cancelled task never writes to the cache.
pub struct EnhancementTask {
    id: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<Option<Arc<ArticleMetadata>>>>,
}

impl EnhancementTask {
    pub fn spawn(manager: Arc<MetadataManager>, id: impl Into<String>, delay: Duration) -> Self {
        let id = id.into();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return None,
                _ = tokio::time::sleep(delay) => {}
            }
            manager.fetch_and_cache(&task_id, &token).await
        });

        Self {
            id,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the fetch; `None` when it failed or was cancelled.
    pub async fn wait(mut self) -> Option<Arc<ArticleMetadata>> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Enhancement task for {} failed: {}", self.id, e);
                None
            }
        }
    }
}

impl Drop for EnhancementTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
