//! Read-only access to gallery content held by the external store.

use crate::content::{ContentItem, ContentQuery, SearchQuery};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for content stores.
///
/// Implementations only read: moderation transitions and new submissions are
/// written by other surfaces.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// List items matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or returns bad data.
    async fn list(&self, query: &ContentQuery) -> Result<Vec<ContentItem>>;

    /// Fetch one item by id, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or returns bad data.
    async fn get(&self, id: &str) -> Result<Option<ContentItem>>;

    /// Name search over public items.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or returns bad data.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>>;
}

/// Content source backed by a fixed in-memory set
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    items: Vec<ContentItem>,
}

impl MemorySource {
    #[must_use]
    pub const fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, query: &ContentQuery) -> Result<Vec<ContentItem>> {
        Ok(query.apply(&self.items))
    }

    async fn get(&self, id: &str) -> Result<Option<ContentItem>> {
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>> {
        Ok(query.apply(&self.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::item;
    use crate::content::{GalleryTab, ModerationStatus};

    #[tokio::test]
    async fn test_memory_source_applies_queries() {
        let source = MemorySource::new(vec![
            item("1", "Star Mage", ModerationStatus::Public, true, 1),
            item("2", "Cat Maid", ModerationStatus::Pending, true, 2),
        ]);

        let listed = source
            .list(&ContentQuery::for_tab(GalleryTab::Music))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let pending = source.get("2").await.unwrap().unwrap();
        assert_eq!(pending.status, ModerationStatus::Pending);
        assert!(source.get("missing").await.unwrap().is_none());

        let found = source.search(&SearchQuery::new("cat").unwrap()).await.unwrap();
        assert!(found.is_empty());
    }
}
