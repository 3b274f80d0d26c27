//! Remote document store trait abstraction.
//!
//! The hosted document store is the single source of truth for favorites
//! and comments; the core only mirrors the latest subscription snapshot.
//! The trait stays at the store's own granularity (per-document
//! get/set/delete, append with a store-assigned id, and live queries)
//! so multi-document operations (the favorite record plus its per-book
//! aggregate) remain visible in the calling code, transaction caveats
//! included.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::subscription::Subscription;
use crate::error::StoreError;

/// Typed path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocPath {
    /// Per-user favorite record: `favorites/{user}/books/{book}`.
    Favorite { user_id: String, book_id: String },
    /// Per-book aggregate: `books/{book}`.
    BookAggregate { book_id: String },
    /// One comment: `books/{book}/comments/{comment}`.
    Comment { book_id: String, comment_id: String },
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocPath::Favorite { user_id, book_id } => {
                write!(f, "favorites/{}/books/{}", user_id, book_id)
            }
            DocPath::BookAggregate { book_id } => write!(f, "books/{}", book_id),
            DocPath::Comment {
                book_id,
                comment_id,
            } => write!(f, "books/{}/comments/{}", book_id, comment_id),
        }
    }
}

/// Collections that accept appends with store-assigned ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionPath {
    /// A book's comment sub-collection: `books/{book}/comments`.
    Comments { book_id: String },
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionPath::Comments { book_id } => write!(f, "books/{}/comments", book_id),
        }
    }
}

/// A document read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id (the last path segment).
    pub id: String,
    pub data: Value,
}

/// Live queries a standing subscription can watch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreQuery {
    /// Whether one user's favorite record for one book exists.
    /// Snapshots contain the record document, or nothing.
    FavoriteStatus { user_id: String, book_id: String },
    /// All comments of one book, ascending by creation time.
    Comments { book_id: String },
    /// Collection-group query spanning every book's comment
    /// sub-collection: the newest `limit` comments, descending.
    RecentComments { limit: usize },
}

/// A standing store subscription delivering full matching-document sets.
pub type StoreSubscription = Subscription<Vec<Document>>;

/// Trait for the remote document store collaborator.
///
/// All operations are non-blocking and report completion via the
/// returned future; subscription snapshots arrive on a channel. An
/// in-memory implementation lives in `adapters::mock` for tests and for
/// embedding without a hosted backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document. `Ok(None)` when it does not exist.
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Create or replace one document.
    async fn set(&self, path: &DocPath, data: Value) -> Result<(), StoreError>;

    /// Delete one document. Deleting a missing document is not an error.
    async fn delete(&self, path: &DocPath) -> Result<(), StoreError>;

    /// Append a document to a collection; the store assigns and returns
    /// its id.
    async fn add(&self, collection: &CollectionPath, data: Value) -> Result<String, StoreError>;

    /// Open a standing subscription for a query. The current matching
    /// set is delivered as the first snapshot, then a fresh full set on
    /// every relevant change, until the token is cancelled or the
    /// receiver dropped.
    fn subscribe(&self, query: StoreQuery) -> StoreSubscription;
}
