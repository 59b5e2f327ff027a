use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::ArticleMetadata;

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up cached metadata for a transaction id
    async fn get(&self, id: &str) -> Option<Arc<ArticleMetadata>>;

    /// Copy of every cached entry. Later writes do not show up in the returned map.
    async fn entries(&self) -> HashMap<String, Arc<ArticleMetadata>>;

    /// Store metadata for a transaction id, replacing any previous entry
    async fn insert(&self, id: &str, metadata: Arc<ArticleMetadata>);

    /// Drop every cached entry
    async fn clear(&self);

    async fn len(&self) -> usize {
        self.entries().await.len()
    }
}
