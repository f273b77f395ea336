//! In-memory backend for tests and the default server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Document, Page, Repository, Result};

/// In-memory document repository.
///
/// Clones share the same underlying map, so a service and a test can hold
/// the same repository.
#[derive(Clone)]
pub struct InMemoryRepository<D: Document> {
    documents: Arc<RwLock<HashMap<D::Id, D>>>,
}

impl<D: Document> InMemoryRepository<D> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<D: Document> Default for InMemoryRepository<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> Repository<D> for InMemoryRepository<D> {
    async fn get(&self, id: D::Id) -> Result<Option<D>> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn save(&self, document: &D) -> Result<()> {
        self.documents
            .write()
            .await
            .insert(document.id(), document.clone());
        Ok(())
    }

    async fn find_where(&self, field: &str, value: &str, page: Page) -> Result<Vec<D>> {
        let documents = self.documents.read().await;

        let mut matching = Vec::new();
        for document in documents.values() {
            let json = serde_json::to_value(document)?;
            if json.get(field).and_then(|v| v.as_str()) == Some(value) {
                matching.push(document.clone());
            }
        }

        matching.sort_by_key(|d| {
            let id: Uuid = d.id().into();
            (d.created_at(), id)
        });

        Ok(matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect())
    }
}
