use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::traits::store::Document;

/// A review comment on a book.
///
/// Comments are append/delete only; there is no edit operation. The `id`
/// is assigned by the document store and is not part of the stored data;
/// it is rehydrated from the document id on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    pub book_id: String,
    pub author_id: String,
    /// Display name of the author at post time.
    pub author_name: String,
    #[serde(default)]
    pub author_photo: Option<String>,
    /// Non-empty review text.
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Rehydrate a comment from a store document, taking the id from
    /// the document rather than the stored data.
    pub fn from_document(doc: &Document) -> Result<Comment, StoreError> {
        let mut comment: Comment =
            serde_json::from_value(doc.data.clone()).map_err(|e| StoreError::Corrupt {
                path: doc.id.clone(),
                message: e.to_string(),
            })?;
        comment.id = doc.id.clone();
        Ok(comment)
    }

    /// The stored representation (id omitted; the store owns it).
    pub fn to_data(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).expect("comment serializes");
        if let Some(map) = value.as_object_mut() {
            map.remove("id");
        }
        value
    }
}

/// Payload for appending a comment. The store assigns the identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub book_id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_photo: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn to_data(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("new comment serializes")
    }
}
