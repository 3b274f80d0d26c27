//! Moonlit - core view models and sync engine for the Moonlit Pages
//! book discovery and review app.
//!
//! The embedding application owns routing and rendering; this crate
//! owns everything between the page and the collaborators: the library
//! catalog view model, the book detail sync model, the recent-activity
//! feed, account flows, and the trait seams for the catalog API, the
//! identity provider, and the remote document store.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod detail;
pub mod domain;
pub mod error;
pub mod feed;
pub mod models;
pub mod traits;
