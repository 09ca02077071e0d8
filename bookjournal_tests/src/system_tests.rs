use std::time::UNIX_EPOCH;

use chrono::NaiveDate;

use bookjournal_tracker::api::NewBookRequest;
use bookjournal_tracker::client::BookJournalTrackerClient;

#[tokio::test]
/// Simple test for the bookjournal tracker
/// Records a book
/// Lists books and checks the book is there exactly once
/// Records the same ISBN again and expects rejection
/// Checks both sorted listings
/// Deletes the book and checks it is gone
async fn bookjournal_tracker_e2e_test() {
    let tracker_url = "http://127.0.0.1:8080";
    let client = BookJournalTrackerClient::new(tracker_url).expect("Failed to create client");

    let isbn = format!(
        "978{}",
        std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    );

    let details = NewBookRequest {
        isbn: isbn.clone(),
        title: "Stranger Things Runaway Max".to_string(),
        date_read: NaiveDate::from_ymd_opt(2022, 12, 1).unwrap(),
        recommendation: 9,
        summary: "Max Mayfield's road to Hawkins".to_string(),
    };

    // ADD BOOK
    let created = client.add_book(&details).await.expect("Failed to add book");
    assert!(created);

    // LIST - the listing runs enrichment server side and must still answer
    let books = client.list_books().await.expect("Failed to list books");
    assert_eq!(books.iter().filter(|book| book.isbn == isbn).count(), 1);

    // ADD AGAIN - this time should be rejected as duplicate
    let created_again = client
        .add_book(&details)
        .await
        .expect("Failed to call add book");
    assert!(!created_again);

    let books = client.list_books().await.expect("Failed to list books");
    assert_eq!(books.iter().filter(|book| book.isbn == isbn).count(), 1);

    // SORTED BY RATING
    let by_rating = client
        .list_books_by_rating()
        .await
        .expect("Failed to list books by rating");
    assert!(by_rating
        .windows(2)
        .all(|pair| pair[0].recommendation >= pair[1].recommendation));
    assert!(by_rating.iter().any(|book| book.isbn == isbn));

    // SORTED BY RECENCY
    let by_recency = client
        .list_books_by_recency()
        .await
        .expect("Failed to list books by recency");
    assert!(by_recency
        .windows(2)
        .all(|pair| pair[0].date_of_reading >= pair[1].date_of_reading));
    assert!(by_recency.iter().any(|book| book.isbn == isbn));

    // DELETE
    let deleted = client
        .delete_book(&isbn)
        .await
        .expect("Failed to delete book");
    assert!(deleted);

    let books = client.list_books().await.expect("Failed to list books");
    assert!(books.iter().all(|book| book.isbn != isbn));

    // DELETE AGAIN - should report not found
    let deleted_again = client
        .delete_book(&isbn)
        .await
        .expect("Failed to call delete book");
    assert!(!deleted_again);
}

#[tokio::test]
/// Deleting an ISBN that was never recorded reports not found
async fn delete_unknown_isbn_reports_not_found() {
    let tracker_url = "http://127.0.0.1:8080";
    let client = BookJournalTrackerClient::new(tracker_url).expect("Failed to create client");

    let deleted = client
        .delete_book("0000000000")
        .await
        .expect("Failed to call delete book");
    assert!(!deleted);
}
