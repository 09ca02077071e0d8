pub use in_memory_books_repository::InMemoryBooksRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use crate::api::{BookRecord, Isbn, NewBookRequest};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(Debug, thiserror::Error)]
pub enum BooksRepositoryError {
    #[error("Book {0} already exists")]
    AlreadyExists(Isbn),

    #[error("Book {0} not found")]
    NotFound(Isbn),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

/// Ordering applied to the listing query
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ListOrder {
    /// Insertion id ascending, the order books were recorded in
    Insertion,
    /// Recommendation score descending
    RatingDesc,
    /// Date of reading descending
    RecencyDesc,
}

#[async_trait::async_trait]
pub trait BooksRepository: Send + Sync {
    /// Records a book, rejects with AlreadyExists if the ISBN is present
    async fn add_book(&self, details: NewBookRequest) -> Result<(), BooksRepositoryError>;
    /// Removes the book with the given ISBN, NotFound if there is no such row
    async fn delete_book(&self, isbn: &str) -> Result<(), BooksRepositoryError>;
    /// Lists all recorded books in the requested order
    async fn list_books(&self, order: ListOrder) -> Result<Vec<BookRecord>, BooksRepositoryError>;
    /// Stores a fetched cover image url for the ISBN, returns false if the row is gone
    async fn upsert_image_url(
        &self,
        isbn: &str,
        image_url: &str,
    ) -> Result<bool, BooksRepositoryError>;
}
