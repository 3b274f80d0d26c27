//! Book detail synchronization model.
//!
//! Keeps one book's favorite flag and comment list in sync with the
//! remote document store, scoped to the current viewer. The store is
//! the single source of truth: mutations are written through, and the
//! authoritative state arrives back over standing subscriptions as full
//! snapshots. Each snapshot carries the [`ViewContext`] captured when
//! its subscription was opened; a snapshot whose context no longer
//! matches the current one is discarded, so a slow listener for a page
//! the viewer already left can never clobber the current page.
//!
//! Favoriting writes two documents, the per-user record and the
//! per-book membership aggregate, as one logical operation without a
//! cross-document transaction. A failure between the writes leaves the
//! pair inconsistent until the next successful toggle; the operation
//! itself reports failure and the local flag stays unchanged.

pub mod context;
pub mod loader;

pub use context::{BookRef, SubscriptionSet, ViewContext};
pub use loader::{load_work, LoadedWork, UNKNOWN_AUTHOR};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::error::{MoonlitError, MoonlitResult, StoreError};
use crate::models::{Comment, FavoriteAggregate, FavoriteRecord, NewComment, UserProfile};
use crate::traits::store::{CollectionPath, DocPath, StoreQuery, StoreSubscription};
use crate::traits::DocumentStore;

/// Viewer-visible state of the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailState {
    /// Anonymous viewer: comments are readable, mutations are rejected.
    Anonymous,
    /// Signed in, book not favorited.
    NotFavorited,
    /// Signed in, book favorited.
    Favorited,
}

/// A snapshot delivered by one of the model's subscriptions, tagged
/// with the context captured when the subscription was opened.
#[derive(Debug, Clone)]
pub enum DetailEvent {
    /// Favorite-status snapshot for the captured context.
    Favorite {
        context: ViewContext,
        favorited: bool,
    },
    /// Full comment list snapshot for the captured context.
    Comments {
        context: ViewContext,
        comments: Vec<Comment>,
    },
    /// A snapshot could not be decoded; surfaces as local error state.
    SubscriptionFailed {
        context: ViewContext,
        error: StoreError,
    },
}

struct ActiveView {
    context: ViewContext,
    book: BookRef,
    viewer: Option<UserProfile>,
}

/// Synchronization model for one book detail view.
///
/// Drive it with [`set_context`](Self::set_context) on navigation or
/// identity change, pump [`next_event`](Self::next_event) into
/// [`apply_event`](Self::apply_event) from the view's event loop, and
/// call the mutation methods from user actions.
pub struct BookDetailModel {
    store: Arc<dyn DocumentStore>,
    active: Option<ActiveView>,
    favorited: bool,
    comments: Vec<Comment>,
    subscriptions: SubscriptionSet,
    events_tx: mpsc::UnboundedSender<DetailEvent>,
    events_rx: mpsc::UnboundedReceiver<DetailEvent>,
    last_error: Option<MoonlitError>,
}

impl BookDetailModel {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            active: None,
            favorited: false,
            comments: Vec::new(),
            subscriptions: SubscriptionSet::new(),
            events_tx,
            events_rx,
            last_error: None,
        }
    }

    /// Point the model at a (book, viewer) pair.
    ///
    /// All subscriptions opened for the previous pair are cancelled
    /// before any new one is established, and mirrored state is reset;
    /// anything still in flight from the old pair is discarded by the
    /// context guard in [`apply_event`](Self::apply_event).
    pub fn set_context(&mut self, book: BookRef, viewer: Option<UserProfile>) {
        self.subscriptions.cancel_all();
        self.favorited = false;
        self.comments.clear();
        self.last_error = None;

        let context = ViewContext::new(
            book.id.clone(),
            viewer.as_ref().map(|user| user.uid.clone()),
        );
        tracing::debug!(book_id = %context.book_id, authenticated = context.is_authenticated(), "detail context change");

        let comments_sub = self.store.subscribe(StoreQuery::Comments {
            book_id: book.id.clone(),
        });
        self.subscriptions.insert(comments_sub.token.clone());
        spawn_comments_forwarder(comments_sub, context.clone(), self.events_tx.clone());

        if let Some(user) = &viewer {
            let favorite_sub = self.store.subscribe(StoreQuery::FavoriteStatus {
                user_id: user.uid.clone(),
                book_id: book.id.clone(),
            });
            self.subscriptions.insert(favorite_sub.token.clone());
            spawn_favorite_forwarder(favorite_sub, context.clone(), self.events_tx.clone());
        }

        self.active = Some(ActiveView {
            context,
            book,
            viewer,
        });
    }

    /// Tear the view down: cancel every subscription and drop mirrored
    /// state. Dropping the model does the same.
    pub fn teardown(&mut self) {
        self.subscriptions.cancel_all();
        self.active = None;
        self.favorited = false;
        self.comments.clear();
    }

    /// Receive the next subscription event, or `None` once all
    /// subscription tasks have ended.
    pub async fn next_event(&mut self) -> Option<DetailEvent> {
        self.events_rx.recv().await
    }

    /// Non-blocking receive for poll-style loops.
    pub fn try_next_event(&mut self) -> Option<DetailEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply already-queued events without blocking; returns how many
    /// were applied (discarded stale events do not count).
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_next_event() {
            if self.apply_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one subscription event.
    ///
    /// Returns false when the event was discarded because its captured
    /// context no longer matches the current one: the staleness guard
    /// that keeps a superseded pair's snapshots from overwriting the
    /// current pair's state.
    pub fn apply_event(&mut self, event: DetailEvent) -> bool {
        let Some(current) = self.active.as_ref().map(|view| view.context.clone()) else {
            tracing::debug!("discarding event: no active context");
            return false;
        };

        match event {
            DetailEvent::Favorite { context, favorited } => {
                if context != current {
                    tracing::debug!(book_id = %context.book_id, "discarding stale favorite snapshot");
                    return false;
                }
                self.favorited = favorited;
                true
            }
            DetailEvent::Comments { context, comments } => {
                if context != current {
                    tracing::debug!(book_id = %context.book_id, "discarding stale comments snapshot");
                    return false;
                }
                self.comments = comments;
                true
            }
            DetailEvent::SubscriptionFailed { context, error } => {
                if context != current {
                    return false;
                }
                tracing::warn!(error = %error, "detail subscription failed");
                self.last_error = Some(MoonlitError::Remote(error));
                true
            }
        }
    }

    /// Flip the favorite state for the current viewer.
    ///
    /// Writes the per-user record and updates the per-book aggregate
    /// membership. On any failure the local flag is left unchanged and
    /// the error surfaces to the caller; a partial flip is never
    /// reported as success. Returns the new state.
    pub async fn toggle_favorite(&mut self) -> MoonlitResult<bool> {
        let Some(view) = &self.active else {
            return Err(MoonlitError::AuthenticationRequired);
        };
        let Some(user) = &view.viewer else {
            return Err(MoonlitError::AuthenticationRequired);
        };

        let favorite_path = DocPath::Favorite {
            user_id: user.uid.clone(),
            book_id: view.book.id.clone(),
        };
        let aggregate_path = DocPath::BookAggregate {
            book_id: view.book.id.clone(),
        };
        let flip_to = !self.favorited;

        if flip_to {
            let record = FavoriteRecord {
                user_id: user.uid.clone(),
                book_id: view.book.id.clone(),
                title: view.book.title.clone(),
                cover_i: view.book.cover_i,
                added_at: Utc::now(),
            };
            self.store.set(&favorite_path, record.to_data()).await?;
            let mut aggregate = self.read_aggregate(&aggregate_path).await?;
            aggregate.add(&user.uid);
            self.store.set(&aggregate_path, aggregate.to_data()).await?;
        } else {
            self.store.delete(&favorite_path).await?;
            let mut aggregate = self.read_aggregate(&aggregate_path).await?;
            aggregate.remove(&user.uid);
            self.store.set(&aggregate_path, aggregate.to_data()).await?;
        }

        self.favorited = flip_to;
        Ok(flip_to)
    }

    /// Append a comment as the current viewer.
    ///
    /// Text that is empty after trimming is a silent no-op. There is no
    /// optimistic echo: the authoritative list arrives over the
    /// comments subscription. Returns the store-assigned id of the new
    /// comment, or `None` for the empty no-op.
    pub async fn add_comment(&mut self, text: &str) -> MoonlitResult<Option<String>> {
        let Some(view) = &self.active else {
            return Err(MoonlitError::AuthenticationRequired);
        };
        let Some(user) = &view.viewer else {
            return Err(MoonlitError::AuthenticationRequired);
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let comment = NewComment {
            book_id: view.book.id.clone(),
            author_id: user.uid.clone(),
            author_name: user.display_label().to_string(),
            author_photo: user.photo_url.clone(),
            text: trimmed.to_string(),
            created_at: Utc::now(),
        };
        let collection = CollectionPath::Comments {
            book_id: view.book.id.clone(),
        };
        let id = self.store.add(&collection, comment.to_data()).await?;
        Ok(Some(id))
    }

    /// Delete a comment the current viewer authored.
    ///
    /// A comment that does not exist or belongs to someone else is
    /// silently ignored; the view never offers the control to
    /// non-authors, so this is a defensive precondition, not an error
    /// path.
    pub async fn delete_comment(&mut self, comment_id: &str) -> MoonlitResult<()> {
        let Some(view) = &self.active else {
            return Err(MoonlitError::AuthenticationRequired);
        };
        let Some(user) = &view.viewer else {
            return Err(MoonlitError::AuthenticationRequired);
        };

        let owned = self
            .comments
            .iter()
            .any(|comment| comment.id == comment_id && comment.author_id == user.uid);
        if !owned {
            tracing::debug!(comment_id, "ignoring delete of non-owned comment");
            return Ok(());
        }

        let path = DocPath::Comment {
            book_id: view.book.id.clone(),
            comment_id: comment_id.to_string(),
        };
        self.store.delete(&path).await?;
        Ok(())
    }

    /// Viewer-visible state of the page.
    pub fn state(&self) -> DetailState {
        match &self.active {
            Some(view) if view.viewer.is_some() => {
                if self.favorited {
                    DetailState::Favorited
                } else {
                    DetailState::NotFavorited
                }
            }
            _ => DetailState::Anonymous,
        }
    }

    pub fn favorited(&self) -> bool {
        self.favorited
    }

    /// The latest comment list snapshot, ascending by creation time.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn context(&self) -> Option<&ViewContext> {
        self.active.as_ref().map(|view| &view.context)
    }

    /// Number of live subscriptions (two when signed in, one otherwise).
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Take the latest subscription error, clearing it.
    pub fn take_error(&mut self) -> Option<MoonlitError> {
        self.last_error.take()
    }

    async fn read_aggregate(&self, path: &DocPath) -> MoonlitResult<FavoriteAggregate> {
        match self.store.get(path).await? {
            Some(doc) => Ok(FavoriteAggregate::from_document(&doc)?),
            None => Ok(FavoriteAggregate::default()),
        }
    }
}

fn spawn_comments_forwarder(
    mut subscription: StoreSubscription,
    context: ViewContext,
    events: mpsc::UnboundedSender<DetailEvent>,
) {
    tokio::spawn(async move {
        while let Some(docs) = subscription.recv().await {
            if subscription.token.is_cancelled() {
                break;
            }
            let mut comments = Vec::with_capacity(docs.len());
            let mut failure = None;
            for doc in &docs {
                match Comment::from_document(doc) {
                    Ok(comment) => comments.push(comment),
                    Err(err) => {
                        failure = Some(err);
                        break;
                    }
                }
            }
            let event = match failure {
                Some(error) => DetailEvent::SubscriptionFailed {
                    context: context.clone(),
                    error,
                },
                None => DetailEvent::Comments {
                    context: context.clone(),
                    comments,
                },
            };
            if events.send(event).is_err() {
                break;
            }
        }
    });
}

fn spawn_favorite_forwarder(
    mut subscription: StoreSubscription,
    context: ViewContext,
    events: mpsc::UnboundedSender<DetailEvent>,
) {
    tokio::spawn(async move {
        while let Some(docs) = subscription.recv().await {
            if subscription.token.is_cancelled() {
                break;
            }
            let event = DetailEvent::Favorite {
                context: context.clone(),
                favorited: !docs.is_empty(),
            };
            if events.send(event).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;

    fn user(uid: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            email: format!("{}@example.com", uid),
            display_name: None,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    fn dune() -> BookRef {
        BookRef::new("OL1W", "Dune", Some(42))
    }

    fn model_with_store() -> (BookDetailModel, InMemoryStore) {
        let store = InMemoryStore::new();
        let model = BookDetailModel::new(Arc::new(store.clone()));
        (model, store)
    }

    #[tokio::test]
    async fn test_anonymous_mutations_rejected_without_writes() {
        let (mut model, store) = model_with_store();
        model.set_context(dune(), None);

        let err = model.toggle_favorite().await.unwrap_err();
        assert!(matches!(err, MoonlitError::AuthenticationRequired));

        let err = model.add_comment("great book").await.unwrap_err();
        assert!(matches!(err, MoonlitError::AuthenticationRequired));

        let err = model.delete_comment("c1").await.unwrap_err();
        assert!(matches!(err, MoonlitError::AuthenticationRequired));

        assert_eq!(store.write_count(), 0);
        assert_eq!(model.state(), DetailState::Anonymous);
    }

    #[tokio::test]
    async fn test_no_context_is_anonymous() {
        let (mut model, store) = model_with_store();
        let err = model.toggle_favorite().await.unwrap_err();
        assert!(matches!(err, MoonlitError::AuthenticationRequired));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_subscription_counts_by_identity() {
        let (mut model, _store) = model_with_store();
        model.set_context(dune(), None);
        assert_eq!(model.subscription_count(), 1);

        model.set_context(dune(), Some(user("u1")));
        assert_eq!(model.subscription_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_comment_is_silent_noop() {
        let (mut model, store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));

        assert_eq!(model.add_comment("   ").await.unwrap(), None);
        assert_eq!(model.add_comment("").await.unwrap(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_comment_text_is_trimmed() {
        let (mut model, store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));

        let id = model.add_comment("  a classic  ").await.unwrap().unwrap();
        let path = DocPath::Comment {
            book_id: "OL1W".to_string(),
            comment_id: id,
        };
        let data = store.document(&path).unwrap();
        assert_eq!(data["text"], "a classic");
    }

    #[tokio::test]
    async fn test_delete_foreign_comment_is_silent_and_writes_nothing() {
        let (mut model, store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));

        let foreign = Comment {
            id: "c-foreign".to_string(),
            book_id: "OL1W".to_string(),
            author_id: "u2".to_string(),
            author_name: "Someone Else".to_string(),
            author_photo: None,
            text: "mine".to_string(),
            created_at: Utc::now(),
        };
        let context = model.context().unwrap().clone();
        model.apply_event(DetailEvent::Comments {
            context,
            comments: vec![foreign],
        });

        let writes_before = store.write_count();
        model.delete_comment("c-foreign").await.unwrap();
        assert_eq!(store.write_count(), writes_before);
    }

    #[tokio::test]
    async fn test_stale_event_for_previous_book_discarded() {
        let (mut model, _store) = model_with_store();
        let viewer = Some(user("u1"));
        model.set_context(dune(), viewer.clone());
        let old_context = model.context().unwrap().clone();

        model.set_context(BookRef::new("OL2W", "Dune Messiah", None), viewer);

        let applied = model.apply_event(DetailEvent::Favorite {
            context: old_context,
            favorited: true,
        });
        assert!(!applied);
        assert!(!model.favorited());
    }

    #[tokio::test]
    async fn test_stale_event_for_previous_viewer_discarded() {
        let (mut model, _store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));
        let old_context = model.context().unwrap().clone();

        // Same book, viewer signed out.
        model.set_context(dune(), None);

        let applied = model.apply_event(DetailEvent::Comments {
            context: old_context,
            comments: vec![],
        });
        assert!(!applied);
    }

    #[tokio::test]
    async fn test_context_change_cancels_previous_subscriptions() {
        let (mut model, store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));
        model.set_context(BookRef::new("OL2W", "Dune Messiah", None), None);

        // One comments subscription for the new context; the two old
        // tokens are cancelled and get pruned on the next publish.
        assert_eq!(model.subscription_count(), 1);
        store
            .set(
                &DocPath::Favorite {
                    user_id: "u1".to_string(),
                    book_id: "OL1W".to_string(),
                },
                serde_json::json!({"title": "Dune"}),
            )
            .await
            .unwrap();
        assert_eq!(store.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_teardown_cancels_everything() {
        let (mut model, _store) = model_with_store();
        model.set_context(dune(), Some(user("u1")));
        model.teardown();
        assert_eq!(model.subscription_count(), 0);
        assert!(model.context().is_none());
        assert_eq!(model.state(), DetailState::Anonymous);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_surfaces_as_error_state() {
        let (mut model, _store) = model_with_store();
        model.set_context(dune(), None);
        let context = model.context().unwrap().clone();

        model.apply_event(DetailEvent::SubscriptionFailed {
            context,
            error: StoreError::Corrupt {
                path: "books/OL1W/comments/c1".to_string(),
                message: "bad shape".to_string(),
            },
        });
        let err = model.take_error().unwrap();
        assert!(matches!(err, MoonlitError::Remote(_)));
        assert!(model.take_error().is_none());
    }
}
