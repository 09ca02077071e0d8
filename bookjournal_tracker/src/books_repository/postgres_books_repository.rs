use anyhow::Context;
use tokio_postgres::{Client, NoTls, Statement};

use crate::api::{BookRecord, NewBookRequest};
use crate::books_repository::{BooksRepository, BooksRepositoryError, ListOrder};

pub struct PostgresBooksRepository {
    client: Client,
}

pub struct PostgresBooksRepositoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl PostgresBooksRepository {
    pub async fn init(config: PostgresBooksRepositoryConfig) -> anyhow::Result<Self> {
        let connection_str = format!(
            "postgresql://{}:{}@{}/{}",
            config.username, config.password, config.hostname, config.database
        );
        tracing::info!(
            "Connecting to postgres at {} database {}",
            config.hostname,
            config.database
        );
        let (client, connection) = tokio_postgres::connect(&connection_str, NoTls)
            .await
            .context("Failed to start postgres")?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("connection error: {}", e);
            }
        });

        client
            .batch_execute(
                "
        CREATE TABLE IF NOT EXISTS books (
            id              SERIAL PRIMARY KEY,
            isbn            TEXT NOT NULL UNIQUE,
            book_title      TEXT NOT NULL,
            date_of_reading DATE NOT NULL,
            recommendation  INTEGER NOT NULL,
            summary         TEXT NOT NULL,
            image_url       TEXT
            )
        ",
            )
            .await
            .context("Failed to setup books table")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl BooksRepository for PostgresBooksRepository {
    async fn add_book(&self, details: NewBookRequest) -> Result<(), BooksRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare(
                "INSERT INTO books (isbn, book_title, date_of_reading, recommendation, summary) \
                 VALUES ($1, $2, $3, $4, $5) ON CONFLICT (isbn) DO NOTHING RETURNING id",
            )
            .await?;

        let rows = self
            .client
            .query(
                &stmt,
                &[
                    &details.isbn,
                    &details.title,
                    &details.date_read,
                    &details.recommendation,
                    &details.summary,
                ],
            )
            .await?;

        // No returned id means the conflict arm fired
        if rows.is_empty() {
            Err(BooksRepositoryError::AlreadyExists(details.isbn))
        } else {
            Ok(())
        }
    }

    async fn delete_book(&self, isbn: &str) -> Result<(), BooksRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("DELETE FROM books WHERE isbn = $1 RETURNING id")
            .await?;

        let rows = self.client.query(&stmt, &[&isbn]).await?;

        if rows.is_empty() {
            Err(BooksRepositoryError::NotFound(isbn.to_string()))
        } else {
            Ok(())
        }
    }

    async fn list_books(&self, order: ListOrder) -> Result<Vec<BookRecord>, BooksRepositoryError> {
        let query = match order {
            ListOrder::Insertion => {
                "SELECT id, isbn, book_title, date_of_reading, recommendation, summary, image_url \
                 FROM books ORDER BY id ASC"
            }
            ListOrder::RatingDesc => {
                "SELECT id, isbn, book_title, date_of_reading, recommendation, summary, image_url \
                 FROM books ORDER BY recommendation DESC"
            }
            ListOrder::RecencyDesc => {
                "SELECT id, isbn, book_title, date_of_reading, recommendation, summary, image_url \
                 FROM books ORDER BY date_of_reading DESC"
            }
        };
        let stmt: Statement = self.client.prepare(query).await?;

        let rows = self.client.query(&stmt, &[]).await?;

        rows.iter()
            .map(|row| {
                Ok(BookRecord {
                    id: row.try_get(0)?,
                    isbn: row.try_get(1)?,
                    title: row.try_get(2)?,
                    date_of_reading: row.try_get(3)?,
                    recommendation: row.try_get(4)?,
                    summary: row.try_get(5)?,
                    image_url: row.try_get(6)?,
                })
            })
            .collect()
    }

    async fn upsert_image_url(
        &self,
        isbn: &str,
        image_url: &str,
    ) -> Result<bool, BooksRepositoryError> {
        let stmt: Statement = self
            .client
            .prepare("UPDATE books SET image_url = $2 WHERE isbn = $1 RETURNING id")
            .await?;

        let rows = self.client.query(&stmt, &[&isbn, &image_url]).await?;
        Ok(!rows.is_empty())
    }
}
