//! One-shot detail page loading.
//!
//! Fetches one work and resolves its author names. The author lookups
//! for a work are issued concurrently and joined; a lookup that fails
//! degrades to a placeholder name instead of failing the whole page,
//! while a missing work id fails the load outright: the page is
//! useless without the work, but perfectly readable with one author
//! unnamed.

use futures::future;

use crate::error::MoonlitResult;
use crate::models::WorkDetail;
use crate::traits::CatalogApi;

use super::context::BookRef;

/// Placeholder shown when an author lookup fails.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A loaded detail page: the work plus its resolved author names, in
/// the work's author order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedWork {
    /// The bare work id the page was loaded for.
    pub id: String,
    pub work: WorkDetail,
    pub author_names: Vec<String>,
}

impl LoadedWork {
    /// The book identity handed to the sync model.
    pub fn book_ref(&self) -> BookRef {
        BookRef::from_work(&self.id, &self.work)
    }
}

/// Load one work and resolve its authors.
///
/// A missing id surfaces as [`crate::error::MoonlitError::NotFound`];
/// other catalog failures propagate for the caller to turn into local
/// error state.
pub async fn load_work(catalog: &dyn CatalogApi, id: &str) -> MoonlitResult<LoadedWork> {
    let work = catalog.get_work(id).await?;

    let keys = work.author_keys();
    let lookups = keys.iter().map(|key| catalog.get_author(key));
    let results = future::join_all(lookups).await;

    let author_names = results
        .into_iter()
        .zip(keys.iter())
        .map(|(result, key)| match result {
            Ok(author) => author.name,
            Err(err) => {
                tracing::warn!(author_key = %key, error = %err, "author lookup failed");
                UNKNOWN_AUTHOR.to_string()
            }
        })
        .collect();

    Ok(LoadedWork {
        id: id.to_string(),
        work,
        author_names,
    })
}
