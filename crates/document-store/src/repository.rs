use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::Result;

/// An entity that can be stored as a document.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The id type of this entity.
    type Id: Copy + Eq + Hash + Display + Into<Uuid> + Send + Sync + 'static;

    /// The document kind, used to keep different entities apart in one table.
    fn kind() -> &'static str;

    /// Returns the document id.
    fn id(&self) -> Self::Id;

    /// Returns the creation time. Listings are ordered by it.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Creates a page request.
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// Number of documents to skip.
    pub fn offset(&self) -> usize {
        self.number as usize * self.size as usize
    }

    /// Maximum number of documents to return.
    pub fn limit(&self) -> usize {
        self.size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 0, size: 10 }
    }
}

/// Storage for documents of a single kind.
///
/// `save` is an upsert; there are no version checks, so concurrent writers
/// of the same id race and the last write wins.
#[async_trait]
pub trait Repository<D: Document>: Send + Sync {
    /// Loads a document by id. Returns `None` if it doesn't exist.
    async fn get(&self, id: D::Id) -> Result<Option<D>>;

    /// Inserts or replaces a document.
    async fn save(&self, document: &D) -> Result<()>;

    /// Returns documents whose top-level string `field` equals `value`,
    /// ordered by creation time.
    async fn find_where(&self, field: &str, value: &str, page: Page) -> Result<Vec<D>>;
}

/// A repository chosen at runtime.
pub type SharedRepository<D> = Arc<dyn Repository<D>>;

#[async_trait]
impl<D, R> Repository<D> for Arc<R>
where
    D: Document,
    R: Repository<D> + ?Sized,
{
    async fn get(&self, id: D::Id) -> Result<Option<D>> {
        (**self).get(id).await
    }

    async fn save(&self, document: &D) -> Result<()> {
        (**self).save(document).await
    }

    async fn find_where(&self, field: &str, value: &str, page: Page) -> Result<Vec<D>> {
        (**self).find_where(field, value, page).await
    }
}
