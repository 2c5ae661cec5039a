//! Catalog sources: where the product list comes from.
//!
//! A source is fetched once per load. `HttpSource` reads a JSON document over
//! HTTP, `FileSource` reads the same document from disk. `AnySource` picks one
//! of them from a configuration string.

use std::future::Future;
use std::path::{Path, PathBuf};

use mercadito_core::Product;
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;

/// Something that can produce the full product list.
pub trait CatalogSource {
    /// Fetch every product, in catalog order.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Parse a JSON array of products, logging a snippet of the body on failure.
fn parse_products(body: &str, origin: &str) -> Result<Vec<Product>, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            origin,
            body = %body.chars().take(200).collect::<String>(),
            "Failed to parse catalog"
        );
        CatalogError::Parse(e)
    })
}

// =============================================================================
// HttpSource
// =============================================================================

/// Catalog served as a JSON document over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSource {
    /// Create a source for `url` with a default client.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// The catalog URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl CatalogSource for HttpSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        debug!(bytes = body.len(), "Catalog response received");
        parse_products(&body, self.url.as_str())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

// =============================================================================
// FileSource
// =============================================================================

/// Catalog stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The catalog file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_products(&body, &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// AnySource
// =============================================================================

/// A source chosen at runtime from a location string.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    /// Interpret `location` as an `http(s)://` URL or, failing that, a file path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSource`] for an empty location or an
    /// unparseable URL.
    pub fn parse(location: &str) -> Result<Self, CatalogError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(CatalogError::InvalidSource(
                String::new(),
                "location is empty".to_string(),
            ));
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|e| {
                CatalogError::InvalidSource(location.to_string(), e.to_string())
            })?;
            return Ok(Self::Http(HttpSource::new(url)));
        }

        Ok(Self::File(FileSource::new(location)))
    }
}

impl CatalogSource for AnySource {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::File(source) => source.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.describe(),
            Self::File(source) => source.describe(),
        }
    }
}
