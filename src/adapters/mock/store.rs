//! In-memory document store for testing.
//!
//! Implements the [`DocumentStore`] trait without a hosted backend: every
//! mutation pushes a fresh full snapshot to each live subscription whose
//! query it affects. Failures can be injected per path to exercise the
//! no-partial-flip contract and the two-write consistency window, and all
//! writes are recorded for verification.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::store::{
    CollectionPath, DocPath, Document, DocumentStore, StoreQuery, StoreSubscription,
};
use crate::traits::subscription::{Subscription, SubscriptionToken};

/// A recorded write for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    Set(DocPath),
    Delete(DocPath),
    Add { collection: CollectionPath, id: String },
}

struct Listener {
    query: StoreQuery,
    sender: mpsc::UnboundedSender<Vec<Document>>,
    token: SubscriptionToken,
}

#[derive(Default)]
struct StoreInner {
    documents: HashMap<DocPath, Value>,
    listeners: Vec<Listener>,
    writes: Vec<RecordedWrite>,
    fail_paths: HashMap<DocPath, StoreError>,
    fail_collections: HashMap<CollectionPath, StoreError>,
    fail_all: Option<StoreError>,
}

/// In-memory [`DocumentStore`] implementation.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::default())),
        }
    }

    /// Make every operation touching `path` fail with `err`.
    pub fn fail_path(&self, path: DocPath, err: StoreError) {
        self.inner.lock().unwrap().fail_paths.insert(path, err);
    }

    /// Make appends to `collection` fail with `err`.
    pub fn fail_collection(&self, collection: CollectionPath, err: StoreError) {
        self.inner
            .lock()
            .unwrap()
            .fail_collections
            .insert(collection, err);
    }

    /// Make every operation fail with `err`.
    pub fn fail_everything(&self, err: StoreError) {
        self.inner.lock().unwrap().fail_all = Some(err);
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_paths.clear();
        inner.fail_collections.clear();
        inner.fail_all = None;
    }

    /// All writes accepted so far, in order.
    pub fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Number of writes accepted so far.
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap().writes.len()
    }

    /// Direct peek at a stored document, bypassing failure injection.
    pub fn document(&self, path: &DocPath) -> Option<Value> {
        self.inner.lock().unwrap().documents.get(path).cloned()
    }

    /// Number of listeners still attached (cancelled ones are pruned on
    /// the next delivery attempt).
    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    fn check_failure(inner: &StoreInner, path: &DocPath) -> Result<(), StoreError> {
        if let Some(err) = &inner.fail_all {
            return Err(err.clone());
        }
        if let Some(err) = inner.fail_paths.get(path) {
            return Err(err.clone());
        }
        Ok(())
    }

    fn doc_id(path: &DocPath) -> String {
        match path {
            DocPath::Favorite { book_id, .. } => book_id.clone(),
            DocPath::BookAggregate { book_id } => book_id.clone(),
            DocPath::Comment { comment_id, .. } => comment_id.clone(),
        }
    }

    fn created_at(data: &Value) -> DateTime<Utc> {
        data.get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC)
    }

    fn snapshot(inner: &StoreInner, query: &StoreQuery) -> Vec<Document> {
        match query {
            StoreQuery::FavoriteStatus { user_id, book_id } => {
                let path = DocPath::Favorite {
                    user_id: user_id.clone(),
                    book_id: book_id.clone(),
                };
                inner
                    .documents
                    .get(&path)
                    .map(|data| {
                        vec![Document {
                            id: Self::doc_id(&path),
                            data: data.clone(),
                        }]
                    })
                    .unwrap_or_default()
            }
            StoreQuery::Comments { book_id } => {
                let mut docs: Vec<Document> = inner
                    .documents
                    .iter()
                    .filter_map(|(path, data)| match path {
                        DocPath::Comment {
                            book_id: b,
                            comment_id,
                        } if b == book_id => Some(Document {
                            id: comment_id.clone(),
                            data: data.clone(),
                        }),
                        _ => None,
                    })
                    .collect();
                docs.sort_by(|a, b| {
                    Self::created_at(&a.data)
                        .cmp(&Self::created_at(&b.data))
                        .then_with(|| a.id.cmp(&b.id))
                });
                docs
            }
            StoreQuery::RecentComments { limit } => {
                let mut docs: Vec<Document> = inner
                    .documents
                    .iter()
                    .filter_map(|(path, data)| match path {
                        DocPath::Comment { comment_id, .. } => Some(Document {
                            id: comment_id.clone(),
                            data: data.clone(),
                        }),
                        _ => None,
                    })
                    .collect();
                docs.sort_by(|a, b| {
                    Self::created_at(&b.data)
                        .cmp(&Self::created_at(&a.data))
                        .then_with(|| a.id.cmp(&b.id))
                });
                docs.truncate(*limit);
                docs
            }
        }
    }

    fn affects(query: &StoreQuery, changed: &DocPath) -> bool {
        match (query, changed) {
            (
                StoreQuery::FavoriteStatus { user_id, book_id },
                DocPath::Favorite {
                    user_id: u,
                    book_id: b,
                },
            ) => user_id == u && book_id == b,
            (StoreQuery::Comments { book_id }, DocPath::Comment { book_id: b, .. }) => {
                book_id == b
            }
            (StoreQuery::RecentComments { .. }, DocPath::Comment { .. }) => true,
            _ => false,
        }
    }

    fn publish(inner: &mut StoreInner, changed: &DocPath) {
        // Prune listeners first so a cancelled subscription never
        // receives another snapshot.
        inner.listeners.retain(|l| !l.token.is_cancelled());

        let mut closed = Vec::new();
        for (idx, listener) in inner.listeners.iter().enumerate() {
            if !Self::affects(&listener.query, changed) {
                continue;
            }
            let snapshot = Self::snapshot(inner, &listener.query);
            if listener.sender.send(snapshot).is_err() {
                closed.push(idx);
            }
        }
        for idx in closed.into_iter().rev() {
            inner.listeners.remove(idx);
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Self::check_failure(&inner, path)?;
        Ok(inner.documents.get(path).map(|data| Document {
            id: Self::doc_id(path),
            data: data.clone(),
        }))
    }

    async fn set(&self, path: &DocPath, data: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failure(&inner, path)?;
        inner.documents.insert(path.clone(), data);
        inner.writes.push(RecordedWrite::Set(path.clone()));
        Self::publish(&mut inner, path);
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failure(&inner, path)?;
        inner.documents.remove(path);
        inner.writes.push(RecordedWrite::Delete(path.clone()));
        Self::publish(&mut inner, path);
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, data: Value) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = &inner.fail_all {
            return Err(err.clone());
        }
        if let Some(err) = inner.fail_collections.get(collection) {
            return Err(err.clone());
        }

        let id = Uuid::new_v4().to_string();
        let path = match collection {
            CollectionPath::Comments { book_id } => DocPath::Comment {
                book_id: book_id.clone(),
                comment_id: id.clone(),
            },
        };
        inner.documents.insert(path.clone(), data);
        inner.writes.push(RecordedWrite::Add {
            collection: collection.clone(),
            id: id.clone(),
        });
        Self::publish(&mut inner, &path);
        Ok(id)
    }

    fn subscribe(&self, query: StoreQuery) -> StoreSubscription {
        let (tx, subscription) = Subscription::channel();
        let mut inner = self.inner.lock().unwrap();

        // Deliver the current matching set as the first snapshot.
        let initial = Self::snapshot(&inner, &query);
        let _ = tx.send(initial);

        inner.listeners.push(Listener {
            query,
            sender: tx,
            token: subscription.token.clone(),
        });
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn favorite_path() -> DocPath {
        DocPath::Favorite {
            user_id: "u1".to_string(),
            book_id: "OL1W".to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = InMemoryStore::new();
        let path = favorite_path();

        assert!(store.get(&path).await.unwrap().is_none());

        store.set(&path, json!({"title": "Dune"})).await.unwrap();
        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.id, "OL1W");
        assert_eq!(doc.data["title"], "Dune");

        store.delete(&path).await.unwrap();
        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryStore::new();
        assert!(store.delete(&favorite_path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let store = InMemoryStore::new();
        let collection = CollectionPath::Comments {
            book_id: "OL1W".to_string(),
        };
        let id1 = store.add(&collection, json!({"text": "a"})).await.unwrap();
        let id2 = store.add(&collection, json!({"text": "b"})).await.unwrap();
        assert_ne!(id1, id2);
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_snapshot() {
        let store = InMemoryStore::new();
        store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap();

        let mut sub = store.subscribe(StoreQuery::FavoriteStatus {
            user_id: "u1".to_string(),
            book_id: "OL1W".to_string(),
        });
        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_pushes_on_change() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(StoreQuery::FavoriteStatus {
            user_id: "u1".to_string(),
            book_id: "OL1W".to_string(),
        });
        assert!(sub.recv().await.unwrap().is_empty());

        store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap();
        assert_eq!(sub.recv().await.unwrap().len(), 1);

        store.delete(&favorite_path()).await.unwrap();
        assert!(sub.recv().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrelated_change_not_delivered() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(StoreQuery::Comments {
            book_id: "OL1W".to_string(),
        });
        assert!(sub.recv().await.unwrap().is_empty());

        // A favorite write does not touch the comments query.
        store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap();
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_cancelled_listener_receives_nothing_more() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(StoreQuery::FavoriteStatus {
            user_id: "u1".to_string(),
            book_id: "OL1W".to_string(),
        });
        assert!(sub.recv().await.unwrap().is_empty());

        sub.cancel();
        store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap();
        assert_eq!(sub.try_recv(), None);
        assert_eq!(store.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_comments_ordered_ascending() {
        let store = InMemoryStore::new();
        let collection = CollectionPath::Comments {
            book_id: "OL1W".to_string(),
        };
        store
            .add(&collection, json!({"text": "second", "created_at": "2026-02-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .add(&collection, json!({"text": "first", "created_at": "2026-01-01T00:00:00Z"}))
            .await
            .unwrap();

        let mut sub = store.subscribe(StoreQuery::Comments {
            book_id: "OL1W".to_string(),
        });
        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot[0].data["text"], "first");
        assert_eq!(snapshot[1].data["text"], "second");
    }

    #[tokio::test]
    async fn test_recent_comments_descending_and_capped() {
        let store = InMemoryStore::new();
        for (book, day) in [("OL1W", 1), ("OL2W", 2), ("OL3W", 3)] {
            let collection = CollectionPath::Comments {
                book_id: book.to_string(),
            };
            store
                .add(
                    &collection,
                    json!({"text": book, "created_at": format!("2026-01-0{}T00:00:00Z", day)}),
                )
                .await
                .unwrap();
        }

        let mut sub = store.subscribe(StoreQuery::RecentComments { limit: 2 });
        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].data["text"], "OL3W");
        assert_eq!(snapshot[1].data["text"], "OL2W");
    }

    #[tokio::test]
    async fn test_injected_path_failure() {
        let store = InMemoryStore::new();
        store.fail_path(
            favorite_path(),
            StoreError::Unavailable {
                message: "offline".to_string(),
            },
        );

        let err = store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert_eq!(store.write_count(), 0);

        store.clear_failures();
        assert!(store.set(&favorite_path(), json!({"title": "Dune"})).await.is_ok());
    }

    #[tokio::test]
    async fn test_recorded_writes() {
        let store = InMemoryStore::new();
        store
            .set(&favorite_path(), json!({"title": "Dune"}))
            .await
            .unwrap();
        store.delete(&favorite_path()).await.unwrap();

        let writes = store.recorded_writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], RecordedWrite::Set(favorite_path()));
        assert_eq!(writes[1], RecordedWrite::Delete(favorite_path()));
    }
}
