//! Library catalog view model.
//!
//! This module provides [`CatalogView`], the view model behind the
//! library page: it holds the full fetched book list and derives the
//! filtered, sorted, paginated subset currently shown. Derivation order
//! is fixed (filter, then sort, then paginate) and recompute is pure:
//! identical inputs yield identical output. The view model performs no
//! network or store access; it only operates on data already provided.

use serde::{Deserialize, Serialize};

use crate::error::{MoonlitError, MoonlitResult};
use crate::models::Book;

/// Sort orders offered by the library page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Preserve original fetch order.
    #[default]
    None,
    /// Ascending by title, case-insensitive.
    Title,
    /// Ascending by first author name, case-insensitive. Books with no
    /// author sort as the empty string, first.
    Author,
}

/// View model for the library listing.
#[derive(Debug, Clone)]
pub struct CatalogView {
    books: Vec<Book>,
    search_query: String,
    sort_option: SortOption,
    current_page: usize,
    page_size: usize,
}

impl CatalogView {
    /// Create an empty view showing `page_size` books per page.
    ///
    /// A non-positive page size would break the pagination math, so it
    /// is rejected up front rather than surfacing later as a division
    /// error.
    pub fn new(page_size: usize) -> MoonlitResult<Self> {
        if page_size == 0 {
            return Err(MoonlitError::InvalidConfiguration {
                message: "page_size must be positive".to_string(),
            });
        }
        Ok(Self {
            books: Vec::new(),
            search_query: String::new(),
            sort_option: SortOption::None,
            current_page: 1,
            page_size,
        })
    }

    /// Replace the working set with a freshly fetched list.
    ///
    /// The current page is re-clamped against the new filtered set;
    /// query and sort selections survive a refetch.
    pub fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
        self.clamp_page();
    }

    /// Set the search query and jump back to the first page.
    ///
    /// Matching is a case-insensitive substring test against the title
    /// or any author name; an empty or whitespace-only query matches
    /// everything.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    /// Change the sort order. The filtered count is unaffected, so the
    /// current page stays valid.
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.sort_option = option;
    }

    /// Navigate to a page. Out-of-range requests are ignored; returns
    /// whether the page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Change how many books one page shows, re-clamping the current
    /// page.
    pub fn set_page_size(&mut self, page_size: usize) -> MoonlitResult<()> {
        if page_size == 0 {
            return Err(MoonlitError::InvalidConfiguration {
                message: "page_size must be positive".to_string(),
            });
        }
        self.page_size = page_size;
        self.clamp_page();
        Ok(())
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of books surviving the current filter.
    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// Total page count; an empty filtered set still has one (empty)
    /// page so the pager always has somewhere to stand.
    pub fn total_pages(&self) -> usize {
        let count = self.filtered_count();
        let pages = (count + self.page_size - 1) / self.page_size;
        pages.max(1)
    }

    /// The books on the current page, after filter and sort.
    pub fn visible_page(&self) -> Vec<Book> {
        let derived = self.derived();
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(derived.len());
        if start >= derived.len() {
            return Vec::new();
        }
        derived[start..end].iter().map(|b| (*b).clone()).collect()
    }

    fn filtered(&self) -> Vec<&Book> {
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return self.books.iter().collect();
        }
        self.books
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&query)
                    || book
                        .author_name
                        .iter()
                        .any(|author| author.to_lowercase().contains(&query))
            })
            .collect()
    }

    fn derived(&self) -> Vec<&Book> {
        let mut books = self.filtered();
        match self.sort_option {
            SortOption::None => {}
            SortOption::Title => {
                // Vec::sort_by is stable, which keeps equal titles in
                // fetch order and makes re-sorting idempotent.
                books.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
            SortOption::Author => {
                books.sort_by(|a, b| {
                    let author_a = a
                        .author_name
                        .first()
                        .map(|s| s.to_lowercase())
                        .unwrap_or_default();
                    let author_b = b
                        .author_name
                        .first()
                        .map(|s| s.to_lowercase())
                        .unwrap_or_default();
                    author_a.cmp(&author_b)
                });
            }
        }
        books
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.current_page > total {
            self.current_page = total;
        }
        if self.current_page < 1 {
            self.current_page = 1;
        }
    }
}
