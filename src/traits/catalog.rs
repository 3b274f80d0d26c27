//! Book catalog trait abstraction.
//!
//! Read-only collaborator: the third-party HTTP service providing book,
//! author, and cover metadata. Abstracted as a trait so view logic can be
//! exercised against a mock without network access.

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::{Author, Book, WorkDetail};

/// Trait for the read-only book catalog collaborator.
///
/// # Example
///
/// ```ignore
/// use moonlit::traits::CatalogApi;
///
/// async fn fetch_library<C: CatalogApi>(catalog: &C) -> Result<Vec<Book>, CatalogError> {
///     catalog.search_books("book", 1000).await
/// }
/// ```
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Full-text search over the catalog, returning up to `limit`
    /// entries.
    async fn search_books(&self, query: &str, limit: u32) -> Result<Vec<Book>, CatalogError>;

    /// Fetch one work by its bare id (no `/works/` prefix). A missing
    /// id is [`CatalogError::NotFound`].
    async fn get_work(&self, id: &str) -> Result<WorkDetail, CatalogError>;

    /// Resolve an author key (e.g. `/authors/OL79034A`) to the author
    /// record.
    async fn get_author(&self, author_key: &str) -> Result<Author, CatalogError>;
}
