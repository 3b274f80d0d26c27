//! Pure domain state objects.
//!
//! No I/O here: [`CatalogView`] derives the library page from an
//! already-fetched list, and [`SessionState`] mirrors the latest
//! auth-state snapshot.

pub mod catalog;
pub mod session;

pub use catalog::{CatalogView, SortOption};
pub use session::SessionState;
