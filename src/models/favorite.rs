use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::traits::store::Document;

/// A user-scoped bookmark on a book.
///
/// Keyed by (user, book); carries a snapshot of the book's title and
/// cover so a favorites listing renders without re-fetching the catalog.
/// The record exists only while the book is marked; unmarking deletes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    pub user_id: String,
    pub book_id: String,
    /// Title snapshot at the time of favoriting.
    pub title: String,
    /// Cover identifier snapshot, when the book had one.
    #[serde(default)]
    pub cover_i: Option<i64>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn to_data(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("favorite record serializes")
    }

    pub fn from_document(doc: &Document) -> Result<FavoriteRecord, StoreError> {
        serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Corrupt {
            path: doc.id.clone(),
            message: e.to_string(),
        })
    }
}

/// Per-book aggregate of the users who favorited it.
///
/// Denormalized alongside the per-user records for cross-user queries.
/// Written and removed together with the per-user record as one logical
/// operation; there is no cross-document transaction, so a failure
/// between the two writes leaves them inconsistent until the next
/// successful toggle (accepted limitation, exercised in tests).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FavoriteAggregate {
    #[serde(default)]
    pub favorited_by: BTreeSet<String>,
}

impl FavoriteAggregate {
    pub fn contains(&self, user_id: &str) -> bool {
        self.favorited_by.contains(user_id)
    }

    pub fn add(&mut self, user_id: &str) {
        self.favorited_by.insert(user_id.to_string());
    }

    pub fn remove(&mut self, user_id: &str) {
        self.favorited_by.remove(user_id);
    }

    pub fn to_data(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("favorite aggregate serializes")
    }

    pub fn from_document(doc: &Document) -> Result<FavoriteAggregate, StoreError> {
        serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Corrupt {
            path: doc.id.clone(),
            message: e.to_string(),
        })
    }
}
