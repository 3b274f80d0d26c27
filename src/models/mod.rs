//! Data models for the Moonlit core.
//!
//! Catalog shapes ([`Book`], [`WorkDetail`], [`Author`]) mirror the wire
//! JSON of the book catalog, with its dynamic fields normalized at the
//! boundary. Store shapes ([`FavoriteRecord`], [`FavoriteAggregate`],
//! [`Comment`]) convert to and from document-store data. [`UserProfile`]
//! is the identity collaborator's snapshot payload.

mod book;
mod comment;
mod favorite;
mod user;

pub use book::{
    Author, AuthorRef, Book, CoverSize, KeyRef, SearchResponse, WorkDetail, GENRES_SHOWN,
};
pub use comment::{Comment, NewComment};
pub use favorite::{FavoriteAggregate, FavoriteRecord};
pub use user::UserProfile;
