use std::time::Duration;

use anyhow::{bail, Context};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";

const CATALOG_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of cover image urls keyed by ISBN
#[async_trait::async_trait]
pub trait CoverImageSource: Send + Sync {
    /// Resolves a cover image url for the given ISBN
    async fn cover_image_url(&self, isbn: &str) -> anyhow::Result<String>;
}

pub struct OpenLibraryCoverProvider {
    catalog_url: String,
    covers_url: String,
    client: ClientWithMiddleware,
}

impl OpenLibraryCoverProvider {
    pub fn new(catalog_url: String, covers_url: String) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .timeout(CATALOG_FETCH_TIMEOUT)
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            catalog_url,
            covers_url,
            client,
        })
    }
}

#[async_trait::async_trait]
impl CoverImageSource for OpenLibraryCoverProvider {
    /// Confirms the ISBN is known to the catalog, then derives the cover url
    /// from the covers host
    async fn cover_image_url(&self, isbn: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(format!("{}/isbn/{}.json", self.catalog_url, isbn))
            .send()
            .await
            .context("Failed to query the book catalog")?;

        if !response.status().is_success() {
            bail!(
                "Catalog lookup for ISBN {} returned {}",
                isbn,
                response.status()
            )
        }

        Ok(format!("{}/b/isbn/{}-M.jpg", self.covers_url, isbn))
    }
}
