//! Core configuration types.
//!
//! Settings for the catalog endpoints and view defaults. Use the builder
//! methods to customize; defaults match the production catalog host.
//!
//! # Example
//!
//! ```ignore
//! use moonlit::config::MoonlitConfig;
//!
//! let config = MoonlitConfig::default()
//!     .with_page_size(40)
//!     .with_search_limit(500);
//! config.validate()?;
//! ```

use crate::error::{MoonlitError, MoonlitResult};
use crate::models::CoverSize;

/// Configuration for the Moonlit core.
#[derive(Debug, Clone)]
pub struct MoonlitConfig {
    /// Base URL of the book catalog API.
    pub catalog_base_url: String,
    /// Base URL of the cover image host.
    pub covers_base_url: String,
    /// How many catalog entries one library fetch requests.
    pub search_limit: u32,
    /// Books shown per library page.
    pub page_size: usize,
    /// How many comments the recent-activity feed mirrors.
    pub feed_limit: usize,
}

impl Default for MoonlitConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://openlibrary.org".to_string(),
            covers_base_url: "https://covers.openlibrary.org/b/id".to_string(),
            search_limit: 1000,
            page_size: 20,
            feed_limit: 20,
        }
    }
}

impl MoonlitConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog API base URL.
    pub fn with_catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_base_url = url.into();
        self
    }

    /// Set the cover image host base URL.
    pub fn with_covers_base_url(mut self, url: impl Into<String>) -> Self {
        self.covers_base_url = url.into();
        self
    }

    /// Set the library fetch limit.
    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    /// Set the books-per-page default.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the recent-activity feed size.
    pub fn with_feed_limit(mut self, limit: usize) -> Self {
        self.feed_limit = limit;
        self
    }

    /// Fail fast on settings that would make the pagination math or the
    /// fetch pipeline misbehave.
    pub fn validate(&self) -> MoonlitResult<()> {
        if self.page_size == 0 {
            return Err(MoonlitError::InvalidConfiguration {
                message: "page_size must be positive".to_string(),
            });
        }
        if self.search_limit == 0 {
            return Err(MoonlitError::InvalidConfiguration {
                message: "search_limit must be positive".to_string(),
            });
        }
        if self.catalog_base_url.is_empty() || self.covers_base_url.is_empty() {
            return Err(MoonlitError::InvalidConfiguration {
                message: "base URLs must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Derive the cover image URL for a cover id at the given size.
    pub fn cover_url(&self, cover_id: i64, size: CoverSize) -> String {
        format!(
            "{}/{}-{}.jpg",
            self.covers_base_url,
            cover_id,
            size.suffix()
        )
    }
}
