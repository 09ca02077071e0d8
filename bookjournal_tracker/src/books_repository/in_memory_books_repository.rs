use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::api::{BookRecord, Isbn, NewBookRequest};
use crate::books_repository::{BooksRepository, BooksRepositoryError, ListOrder};

pub struct InMemoryBooksRepository {
    book_sequence_generator: AtomicI32,
    books: parking_lot::RwLock<HashMap<Isbn, BookRecord>>,
}

impl Default for InMemoryBooksRepository {
    fn default() -> Self {
        Self {
            book_sequence_generator: Default::default(),
            books: Default::default(),
        }
    }
}

#[async_trait::async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn add_book(&self, details: NewBookRequest) -> Result<(), BooksRepositoryError> {
        // Check and insert under one write lock, so racing adds see one winner
        let mut locked_books = self.books.write();
        if locked_books.contains_key(&details.isbn) {
            return Err(BooksRepositoryError::AlreadyExists(details.isbn));
        }
        let id = self.book_sequence_generator.fetch_add(1, Ordering::Relaxed);
        locked_books.insert(
            details.isbn.clone(),
            BookRecord {
                id,
                isbn: details.isbn,
                title: details.title,
                date_of_reading: details.date_read,
                recommendation: details.recommendation,
                summary: details.summary,
                image_url: None,
            },
        );
        Ok(())
    }

    async fn delete_book(&self, isbn: &str) -> Result<(), BooksRepositoryError> {
        if self.books.write().remove(isbn).is_some() {
            Ok(())
        } else {
            Err(BooksRepositoryError::NotFound(isbn.to_string()))
        }
    }

    async fn list_books(&self, order: ListOrder) -> Result<Vec<BookRecord>, BooksRepositoryError> {
        let mut books: Vec<BookRecord> = self.books.read().values().cloned().collect();
        match order {
            ListOrder::Insertion => books.sort_by_key(|book| book.id),
            ListOrder::RatingDesc => {
                books.sort_by_key(|book| std::cmp::Reverse(book.recommendation))
            }
            ListOrder::RecencyDesc => {
                books.sort_by_key(|book| std::cmp::Reverse(book.date_of_reading))
            }
        }
        Ok(books)
    }

    async fn upsert_image_url(
        &self,
        isbn: &str,
        image_url: &str,
    ) -> Result<bool, BooksRepositoryError> {
        let mut locked_books = self.books.write();
        if let Some(book) = locked_books.get_mut(isbn) {
            book.image_url = Some(image_url.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
