//! Test doubles for the collaborator traits.
//!
//! - [`MockCatalog`] - seedable catalog with per-author failure injection
//! - [`MockIdentityProvider`] - in-memory accounts and auth observers
//! - [`InMemoryStore`] - document store with live snapshots, recorded
//!   writes, and per-path failure injection

pub mod catalog;
pub mod identity;
pub mod store;

pub use catalog::MockCatalog;
pub use identity::MockIdentityProvider;
pub use store::{InMemoryStore, RecordedWrite};
