//! Standing-subscription primitives shared by the store and identity
//! collaborators.
//!
//! A subscription is a long-lived listener delivering full state
//! snapshots over a channel, plus a token that detaches the listener.
//! Snapshots replace prior state wholesale; nothing is incremental.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

/// Cancellation token for a standing subscription.
///
/// Cloned freely; cancelling any clone detaches the listener. Collaborator
/// implementations check the token before delivering and drop the listener
/// once it is cancelled.
#[derive(Debug, Clone)]
pub struct SubscriptionToken {
    cancelled: Arc<AtomicBool>,
}

impl SubscriptionToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Detach the listener. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for SubscriptionToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A standing subscription: a snapshot receiver paired with its token.
///
/// Each received value is the full current state for the subscribed
/// query. Dropping the receiver also detaches the listener (the sender
/// side notices the closed channel on its next delivery).
#[derive(Debug)]
pub struct Subscription<T> {
    pub snapshots: mpsc::UnboundedReceiver<T>,
    pub token: SubscriptionToken,
}

impl<T> Subscription<T> {
    /// Build a subscription, returning the sender half for the
    /// collaborator to deliver snapshots on.
    pub fn channel() -> (mpsc::UnboundedSender<T>, Subscription<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Subscription {
                snapshots: rx,
                token: SubscriptionToken::new(),
            },
        )
    }

    /// Receive the next snapshot, or `None` once the subscription is
    /// closed on the collaborator side.
    pub async fn recv(&mut self) -> Option<T> {
        self.snapshots.recv().await
    }

    /// Non-blocking receive for callers draining in a poll loop.
    pub fn try_recv(&mut self) -> Option<T> {
        self.snapshots.try_recv().ok()
    }

    /// Detach the listener.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}
