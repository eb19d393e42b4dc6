//! Catalog loading
//!
//! The catalog is fetched once at startup. HTTP sources get a `v=<millis>`
//! query parameter so intermediate caches never serve a stale document;
//! disk sources are read as-is.

use serde::Deserialize;
use showreel_core::{CatalogStore, Product};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;

/// Where the products document lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    /// An `http://` or `https://` URL
    Url(String),
    /// A local file, from a `file://` URL or a plain path
    File(PathBuf),
}

impl CatalogSource {
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            CatalogSource::File(PathBuf::from(path))
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Url(url) => f.write_str(url),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Append the cache-busting `v` parameter to `url`
pub fn cache_busted(url: &str, now_ms: u128) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}v={now_ms}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Wire shape of the products document
#[derive(Debug, Default, Deserialize)]
struct ProductsDocument {
    #[serde(default)]
    products: Option<Vec<Product>>,
}

/// Decode a products document; a missing or null `products` is an empty catalog
pub fn parse_products(bytes: &[u8]) -> Result<Vec<Product>, LoadError> {
    let document: ProductsDocument = serde_json::from_slice(bytes)?;
    Ok(document.products.unwrap_or_default())
}

/// One-shot catalog fetcher
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_location(location: &str) -> Self {
        Self::new(CatalogSource::parse(location))
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Fetch and decode the catalog
    pub async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        match &self.source {
            CatalogSource::Url(url) => self.fetch_url(url).await,
            CatalogSource::File(path) => fetch_file(path).await,
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<Product>, LoadError> {
        let url = cache_busted(url, unix_millis());
        tracing::debug!("fetching catalog from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status));
        }

        let body = response.bytes().await?;
        parse_products(&body)
    }

    /// Fetch into `store`, leaving it untouched on failure
    ///
    /// Returns whether the fetch succeeded.
    pub async fn load_into(&self, store: &CatalogStore) -> bool {
        match self.fetch().await {
            Ok(products) => {
                tracing::info!("loaded {} products from {}", products.len(), self.source);
                store.replace(products);
                true
            }
            Err(e) => {
                tracing::error!("failed to load products from {}: {}", self.source, e);
                false
            }
        }
    }
}

async fn fetch_file(path: &Path) -> Result<Vec<Product>, LoadError> {
    tracing::debug!("reading catalog from {}", path.display());
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_products(&bytes)
}
