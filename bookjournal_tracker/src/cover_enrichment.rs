use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::api::BookRecord;
use crate::books_repository::BooksRepository;
use crate::cover_image_provider::CoverImageSource;

/// Cap on in-flight catalog fetches within a single listing request
const MAX_CONCURRENT_COVER_FETCHES: usize = 8;

/// Fetches a cover image url for every listed book and stores each fetched url
/// back into the repository keyed by ISBN. Failures stay per book: a failed
/// fetch leaves that book without an image, a failed store is logged and the
/// remaining books keep going.
pub async fn enrich_cover_images(
    books_repository: &Arc<dyn BooksRepository>,
    cover_images: &Arc<dyn CoverImageSource>,
    books: &[BookRecord],
) {
    stream::iter(books)
        .for_each_concurrent(MAX_CONCURRENT_COVER_FETCHES, |book| async move {
            let image_url = match cover_images.cover_image_url(&book.isbn).await {
                Ok(image_url) => image_url,
                Err(err) => {
                    tracing::warn!("Failed to fetch cover image for ISBN {}: {}", book.isbn, err);
                    return;
                }
            };

            match books_repository
                .upsert_image_url(&book.isbn, &image_url)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("Book {} was removed before its cover image was stored", book.isbn);
                }
                Err(err) => {
                    tracing::error!("Failed to store cover image for ISBN {}: {}", book.isbn, err);
                }
            }
        })
        .await;
}

#[cfg(test)]
mod cover_enrichment_tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::api::NewBookRequest;
    use crate::books_repository::{BooksRepository, InMemoryBooksRepository, ListOrder};
    use crate::cover_enrichment::enrich_cover_images;
    use crate::cover_image_provider::CoverImageSource;

    /// Resolves a cover only for the one ISBN it knows, fails for everything else
    struct SingleIsbnCoverSource {
        known_isbn: String,
    }

    #[async_trait::async_trait]
    impl CoverImageSource for SingleIsbnCoverSource {
        async fn cover_image_url(&self, isbn: &str) -> anyhow::Result<String> {
            if isbn == self.known_isbn {
                Ok(format!("http://covers.local/b/isbn/{}-M.jpg", isbn))
            } else {
                anyhow::bail!("Unknown ISBN {}", isbn)
            }
        }
    }

    /// Fails every lookup, the catalog-down case
    struct UnreachableCoverSource;

    #[async_trait::async_trait]
    impl CoverImageSource for UnreachableCoverSource {
        async fn cover_image_url(&self, _isbn: &str) -> anyhow::Result<String> {
            anyhow::bail!("Catalog unreachable")
        }
    }

    fn new_book(isbn: &str, recommendation: i32) -> NewBookRequest {
        NewBookRequest {
            isbn: isbn.to_string(),
            title: format!("title {}", isbn),
            date_read: NaiveDate::from_ymd_opt(2022, 12, 1).unwrap(),
            recommendation,
            summary: "summary".to_string(),
        }
    }

    #[tokio::test]
    /// Tests that an unreachable catalog leaves every row intact and unenriched
    async fn test_unreachable_source_leaves_rows_unchanged() {
        let repo: Arc<dyn BooksRepository> = Arc::new(InMemoryBooksRepository::default());
        let source: Arc<dyn CoverImageSource> = Arc::new(UnreachableCoverSource);

        repo.add_book(new_book("1111111111", 5))
            .await
            .expect("Failed to add book");
        repo.add_book(new_book("2222222222", 8))
            .await
            .expect("Failed to add book");

        let books = repo
            .list_books(ListOrder::Insertion)
            .await
            .expect("Failed to list books");

        enrich_cover_images(&repo, &source, &books).await;

        let books = repo
            .list_books(ListOrder::Insertion)
            .await
            .expect("Failed to list books");
        assert_eq!(books.len(), 2);
        assert!(books.iter().all(|book| book.image_url.is_none()));
    }

    #[tokio::test]
    /// Tests that only books the source resolves get an image url stored
    async fn test_partial_failure_persists_only_fetched_urls() {
        let repo: Arc<dyn BooksRepository> = Arc::new(InMemoryBooksRepository::default());
        let source: Arc<dyn CoverImageSource> = Arc::new(SingleIsbnCoverSource {
            known_isbn: "1111111111".to_string(),
        });

        repo.add_book(new_book("1111111111", 5))
            .await
            .expect("Failed to add book");
        repo.add_book(new_book("2222222222", 8))
            .await
            .expect("Failed to add book");

        let books = repo
            .list_books(ListOrder::Insertion)
            .await
            .expect("Failed to list books");

        enrich_cover_images(&repo, &source, &books).await;

        let books = repo
            .list_books(ListOrder::Insertion)
            .await
            .expect("Failed to list books");
        assert_eq!(
            books[0].image_url.as_deref(),
            Some("http://covers.local/b/isbn/1111111111-M.jpg")
        );
        assert_eq!(books[1].image_url, None);
    }

    #[tokio::test]
    /// Tests that enriching an empty listing is a no-op
    async fn test_empty_listing_is_noop() {
        let repo: Arc<dyn BooksRepository> = Arc::new(InMemoryBooksRepository::default());
        let source: Arc<dyn CoverImageSource> = Arc::new(UnreachableCoverSource);

        enrich_cover_images(&repo, &source, &[]).await;

        let books = repo
            .list_books(ListOrder::Insertion)
            .await
            .expect("Failed to list books");
        assert_eq!(books, vec![]);
    }
}
