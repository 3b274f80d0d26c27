//! View context and subscription ownership for the detail page.
//!
//! A detail view's live data is scoped to the (book, viewer) pair. The
//! pair is captured when subscriptions are opened and travels with every
//! snapshot they deliver, so a late snapshot from a superseded pair can
//! be recognized and discarded. The tokens of all subscriptions opened
//! for one pair are owned together and cancelled together.

use crate::models::{Book, WorkDetail};
use crate::traits::SubscriptionToken;

/// The (book, viewer) pair that scopes a detail view's subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    pub book_id: String,
    /// Signed-in viewer uid, or `None` for an anonymous viewer.
    pub viewer_id: Option<String>,
}

impl ViewContext {
    pub fn new(book_id: impl Into<String>, viewer_id: Option<String>) -> Self {
        Self {
            book_id: book_id.into(),
            viewer_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer_id.is_some()
    }
}

/// The book identity a detail view operates on, carrying the title and
/// cover snapshot stored into favorite records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRef {
    pub id: String,
    pub title: String,
    pub cover_i: Option<i64>,
}

impl BookRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>, cover_i: Option<i64>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cover_i,
        }
    }

    /// Build from a loaded work record and its route id.
    pub fn from_work(id: &str, work: &WorkDetail) -> Self {
        Self {
            id: id.to_string(),
            title: work.title.clone(),
            cover_i: work.primary_cover(),
        }
    }
}

impl From<&Book> for BookRef {
    fn from(book: &Book) -> Self {
        Self {
            id: book.work_id().to_string(),
            title: book.title.clone(),
            cover_i: book.cover_i,
        }
    }
}

/// The set of active subscription tokens owned by the current view
/// context. Replaced atomically on context change: all tokens are
/// cancelled before any new subscription is opened.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    tokens: Vec<SubscriptionToken>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a token opened for the current context.
    pub fn insert(&mut self, token: SubscriptionToken) {
        self.tokens.push(token);
    }

    /// Cancel every owned token and forget them.
    pub fn cancel_all(&mut self) {
        for token in self.tokens.drain(..) {
            token.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
