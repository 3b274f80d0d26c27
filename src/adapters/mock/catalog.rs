//! Mock catalog for testing.
//!
//! Configurable [`CatalogApi`] implementation: seed it with search
//! results, works, and authors; inject per-author failures to exercise
//! the placeholder fallback in the detail loader.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::{Author, Book, WorkDetail};
use crate::traits::CatalogApi;

#[derive(Default)]
struct CatalogInner {
    books: Vec<Book>,
    works: HashMap<String, WorkDetail>,
    authors: HashMap<String, Author>,
    failing_authors: HashSet<String>,
    search_error: Option<CatalogError>,
}

/// In-memory [`CatalogApi`] implementation.
#[derive(Clone)]
pub struct MockCatalog {
    inner: Arc<Mutex<CatalogInner>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CatalogInner::default())),
        }
    }

    /// Seed the search result set.
    pub fn set_books(&self, books: Vec<Book>) {
        self.inner.lock().unwrap().books = books;
    }

    /// Seed one work record.
    pub fn set_work(&self, id: &str, work: WorkDetail) {
        self.inner.lock().unwrap().works.insert(id.to_string(), work);
    }

    /// Seed one author record.
    pub fn set_author(&self, key: &str, name: &str) {
        self.inner.lock().unwrap().authors.insert(
            key.to_string(),
            Author {
                name: name.to_string(),
            },
        );
    }

    /// Make lookups of `key` fail with a server error.
    pub fn fail_author(&self, key: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_authors
            .insert(key.to_string());
    }

    /// Make searches fail with `err`.
    pub fn fail_search(&self, err: CatalogError) {
        self.inner.lock().unwrap().search_error = Some(err);
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn search_books(&self, _query: &str, limit: u32) -> Result<Vec<Book>, CatalogError> {
        let inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.search_error {
            return Err(err.clone());
        }
        Ok(inner.books.iter().take(limit as usize).cloned().collect())
    }

    async fn get_work(&self, id: &str) -> Result<WorkDetail, CatalogError> {
        let inner = self.inner.lock().unwrap();
        inner
            .works
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    async fn get_author(&self, author_key: &str) -> Result<Author, CatalogError> {
        let inner = self.inner.lock().unwrap();
        if inner.failing_authors.contains(author_key) {
            return Err(CatalogError::HttpStatus {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        inner
            .authors
            .get(author_key)
            .cloned()
            .ok_or_else(|| CatalogError::HttpStatus {
                status: 404,
                message: "no such author".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> Book {
        Book {
            key: format!("/works/{}", title),
            title: title.to_string(),
            author_name: vec![],
            cover_i: None,
            subject: vec![],
        }
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let catalog = MockCatalog::new();
        catalog.set_books(vec![book("a"), book("b"), book("c")]);
        let results = catalog.search_books("book", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_work_is_not_found() {
        let catalog = MockCatalog::new();
        let err = catalog.get_work("OL404W").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_author_lookup() {
        let catalog = MockCatalog::new();
        catalog.set_author("/authors/OL79034A", "Frank Herbert");
        let author = catalog.get_author("/authors/OL79034A").await.unwrap();
        assert_eq!(author.name, "Frank Herbert");
    }

    #[tokio::test]
    async fn test_failing_author() {
        let catalog = MockCatalog::new();
        catalog.set_author("/authors/OL1A", "Ada");
        catalog.fail_author("/authors/OL1A");
        assert!(catalog.get_author("/authors/OL1A").await.is_err());
    }
}
