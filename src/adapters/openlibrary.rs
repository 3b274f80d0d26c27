//! OpenLibrary-backed catalog adapter.
//!
//! Production implementation of the [`CatalogApi`] trait against the
//! OpenLibrary HTTP endpoints: `search.json` for the library listing,
//! `works/{id}.json` for detail pages, and `{author_key}.json` for
//! author name resolution. Base URLs come from [`MoonlitConfig`] so
//! tests can point the adapter at a local mock server.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::MoonlitConfig;
use crate::error::CatalogError;
use crate::models::{Author, Book, SearchResponse, WorkDetail};
use crate::traits::CatalogApi;

/// Catalog client over the OpenLibrary REST API.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    config: MoonlitConfig,
}

impl OpenLibraryClient {
    /// Create a client with default reqwest settings.
    pub fn new(config: MoonlitConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client with a custom `reqwest::Client` (timeouts,
    /// connection pools).
    pub fn with_client(http: reqwest::Client, config: MoonlitConfig) -> Self {
        Self { http, config }
    }

    fn search_url(&self, query: &str, limit: u32) -> String {
        format!(
            "{}/search.json?q={}&limit={}",
            self.config.catalog_base_url,
            urlencoding::encode(query),
            limit
        )
    }

    fn work_url(&self, id: &str) -> String {
        format!("{}/works/{}.json", self.config.catalog_base_url, id)
    }

    fn author_url(&self, author_key: &str) -> String {
        // Work records reference authors by absolute key ("/authors/OL79034A");
        // accept a bare id as well.
        if author_key.starts_with('/') {
            format!("{}{}.json", self.config.catalog_base_url, author_key)
        } else {
            format!("{}/authors/{}.json", self.config.catalog_base_url, author_key)
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        tracing::debug!(url, "catalog request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::from_reqwest(url, e))
    }
}

#[async_trait]
impl CatalogApi for OpenLibraryClient {
    async fn search_books(&self, query: &str, limit: u32) -> Result<Vec<Book>, CatalogError> {
        let url = self.search_url(query, limit);
        let response: SearchResponse = self.fetch_json(&url).await?;
        Ok(response.docs)
    }

    async fn get_work(&self, id: &str) -> Result<WorkDetail, CatalogError> {
        let url = self.work_url(id);
        match self.fetch_json::<WorkDetail>(&url).await {
            Err(CatalogError::HttpStatus { status: 404, .. }) => Err(CatalogError::NotFound {
                id: id.to_string(),
            }),
            other => other,
        }
    }

    async fn get_author(&self, author_key: &str) -> Result<Author, CatalogError> {
        let url = self.author_url(author_key);
        self.fetch_json(&url).await
    }
}
