use anyhow::{bail, Context};
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::api::{BookRecord, ListBooksResponse, NewBookRequest};

pub struct BookJournalTrackerClient {
    url: String,
    client: ClientWithMiddleware,
}

impl BookJournalTrackerClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        // Redirects stay unfollowed so the create contract is observable
        let reqwest_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls POST /Newbooks endpoint
    /// Returns true if the book was recorded and redirected to the listing,
    /// false if the ISBN was already present
    pub async fn add_book(&self, details: &NewBookRequest) -> anyhow::Result<bool> {
        let response = self
            .client
            .post(format!("{}/Newbooks", self.url))
            .json(details)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Ok(false);
        }
        if response.status() != StatusCode::FOUND {
            let error: String = response.text().await.unwrap_or_default();
            bail!("Failed to add book {}", error)
        }

        let location_header = response
            .headers()
            .get(LOCATION)
            .context("No location header")?;
        if location_header
            .to_str()
            .context("Failed to convert header to str")?
            != "/"
        {
            bail!("Unexpected redirect target")
        }
        Ok(true)
    }

    /// Calls GET / endpoint, which also runs cover enrichment server side
    pub async fn list_books(&self) -> anyhow::Result<Vec<BookRecord>> {
        self.list(format!("{}/", self.url)).await
    }

    /// Calls GET /books/sortedByRating endpoint
    pub async fn list_books_by_rating(&self) -> anyhow::Result<Vec<BookRecord>> {
        self.list(format!("{}/books/sortedByRating", self.url)).await
    }

    /// Calls GET /books/sortedByRecency endpoint
    pub async fn list_books_by_recency(&self) -> anyhow::Result<Vec<BookRecord>> {
        self.list(format!("{}/books/sortedByRecency", self.url)).await
    }

    /// Calls DELETE /books/{isbn} endpoint
    /// Returns true if the book was deleted and false if the ISBN was not found
    pub async fn delete_book(&self, isbn: &str) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/books/{}", self.url, isbn))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else if response.status().is_success() {
            Ok(true)
        } else {
            let error: String = response.text().await.unwrap_or_default();
            bail!("Failed to delete book {}", error)
        }
    }

    async fn list(&self, url: String) -> anyhow::Result<Vec<BookRecord>> {
        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            let body: ListBooksResponse = response.json().await?;
            Ok(body.books)
        } else {
            let error: String = response.text().await.unwrap_or_default();
            bail!("Failed to list books {}", error)
        }
    }
}
