//! Concrete implementations of the collaborator traits.
//!
//! # Adapters
//!
//! - [`OpenLibraryClient`] - catalog over the OpenLibrary REST API
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for every collaborator;
//! the in-memory store also works as a standalone backend for embedding
//! without a hosted store.

pub mod mock;
pub mod openlibrary;

pub use mock::{InMemoryStore, MockCatalog, MockIdentityProvider};
pub use openlibrary::OpenLibraryClient;
