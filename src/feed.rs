//! Cross-book recent-activity feed.
//!
//! Mirrors the newest comments across every book via the store's
//! collection-group subscription. Restarting the feed supersedes the
//! previous subscription; snapshots are tagged with the generation they
//! were opened under and a late snapshot from a superseded generation
//! is discarded, the same guard the detail view applies to its context.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{MoonlitError, StoreError};
use crate::models::Comment;
use crate::traits::store::{StoreQuery, StoreSubscription};
use crate::traits::{DocumentStore, SubscriptionToken};

/// A snapshot from the feed subscription, tagged with its generation.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Snapshot {
        generation: u64,
        comments: Vec<Comment>,
    },
    Failed {
        generation: u64,
        error: StoreError,
    },
}

/// View model for the recent-activity feed.
pub struct RecentActivityFeed {
    store: Arc<dyn DocumentStore>,
    limit: usize,
    generation: u64,
    token: Option<SubscriptionToken>,
    comments: Vec<Comment>,
    events_tx: mpsc::UnboundedSender<FeedEvent>,
    events_rx: mpsc::UnboundedReceiver<FeedEvent>,
    last_error: Option<MoonlitError>,
}

impl RecentActivityFeed {
    pub fn new(store: Arc<dyn DocumentStore>, limit: usize) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            limit,
            generation: 0,
            token: None,
            comments: Vec::new(),
            events_tx,
            events_rx,
            last_error: None,
        }
    }

    /// Open (or reopen) the feed subscription. Any previous
    /// subscription is cancelled first and its in-flight snapshots are
    /// discarded by the generation guard.
    pub fn start(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation += 1;
        self.comments.clear();
        self.last_error = None;

        let subscription = self.store.subscribe(StoreQuery::RecentComments {
            limit: self.limit,
        });
        self.token = Some(subscription.token.clone());
        spawn_feed_forwarder(subscription, self.generation, self.events_tx.clone());
        tracing::debug!(generation = self.generation, limit = self.limit, "feed started");
    }

    /// Cancel the feed subscription.
    pub fn stop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// Receive the next feed event, or `None` once the subscription
    /// task has ended.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events_rx.recv().await
    }

    /// Non-blocking receive for poll-style loops.
    pub fn try_next_event(&mut self) -> Option<FeedEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply one feed event; returns false when it was discarded as
    /// belonging to a superseded generation.
    pub fn apply_event(&mut self, event: FeedEvent) -> bool {
        match event {
            FeedEvent::Snapshot {
                generation,
                comments,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, "discarding stale feed snapshot");
                    return false;
                }
                self.comments = comments;
                true
            }
            FeedEvent::Failed { generation, error } => {
                if generation != self.generation {
                    return false;
                }
                tracing::warn!(error = %error, "feed subscription failed");
                self.last_error = Some(MoonlitError::Remote(error));
                true
            }
        }
    }

    /// The latest mirrored comments, newest first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Take the latest subscription error, clearing it.
    pub fn take_error(&mut self) -> Option<MoonlitError> {
        self.last_error.take()
    }
}

impl Drop for RecentActivityFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_feed_forwarder(
    mut subscription: StoreSubscription,
    generation: u64,
    events: mpsc::UnboundedSender<FeedEvent>,
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
                Some(error) => FeedEvent::Failed { generation, error },
                None => FeedEvent::Snapshot {
                    generation,
                    comments,
                },
            };
            if events.send(event).is_err() {
                break;
            }
        }
    });
}
