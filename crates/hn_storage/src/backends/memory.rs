use async_trait::async_trait;
use hn_core::{ArticleMetadata, MetadataStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime metadata cache. Entries never expire; `clear` is the only
/// way to drop them.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    entries: Arc<RwLock<HashMap<String, Arc<ArticleMetadata>>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get(&self, id: &str) -> Option<Arc<ArticleMetadata>> {
        self.entries.read().await.get(id).cloned()
    }

    async fn entries(&self) -> HashMap<String, Arc<ArticleMetadata>> {
        self.entries.read().await.clone()
    }

    async fn insert(&self, id: &str, metadata: Arc<ArticleMetadata>) {
        self.entries.write().await.insert(id.to_string(), metadata);
    }

    async fn clear(&self) {
        let mut entries = self.entries.write().await;
        tracing::debug!("Clearing {} cached metadata entries", entries.len());
        entries.clear();
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str) -> Arc<ArticleMetadata> {
        Arc::new(ArticleMetadata {
            title: Some(title.to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = InMemoryMetadataStore::new();
        assert!(store.get("tx1").await.is_none());

        let meta = metadata("Test Article");
        store.insert("tx1", meta.clone()).await;

        let cached = store.get("tx1").await.unwrap();
        assert!(Arc::ptr_eq(&cached, &meta));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_is_a_snapshot() {
        let store = InMemoryMetadataStore::new();
        store.insert("tx1", metadata("one")).await;

        let snapshot = store.entries().await;
        store.insert("tx2", metadata("two")).await;

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("tx1"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryMetadataStore::new();
        store.insert("tx1", metadata("one")).await;
        store.insert("tx2", metadata("two")).await;
        store.clear().await;
        assert_eq!(store.len().await, 0);
        assert!(store.get("tx1").await.is_none());
    }
}
