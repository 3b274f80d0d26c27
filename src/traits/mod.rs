//! Trait abstractions for the external collaborators.
//!
//! The core never talks to a hosted SDK directly; it consumes these
//! seams, enabling dependency injection and mocking in tests.
//!
//! # Traits
//!
//! - [`CatalogApi`] - read-only book catalog (search, works, authors)
//! - [`IdentityProvider`] - sign-up/sign-in/sign-out and auth observation
//! - [`DocumentStore`] - favorites/comments documents and live queries

pub mod catalog;
pub mod identity;
pub mod store;
pub mod subscription;

pub use catalog::CatalogApi;
pub use identity::{AuthSubscription, IdentityProvider};
pub use store::{
    CollectionPath, DocPath, Document, DocumentStore, StoreQuery, StoreSubscription,
};
pub use subscription::{Subscription, SubscriptionToken};
