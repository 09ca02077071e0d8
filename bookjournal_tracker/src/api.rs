use chrono::NaiveDate;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type Isbn = String;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A recorded book together with its storage id and the cached cover image url
pub struct BookRecord {
    pub id: i32,
    pub isbn: Isbn,
    pub title: String,
    pub date_of_reading: NaiveDate,
    pub recommendation: i32,
    pub summary: String,
    /// Empty until the first enrichment pass stores a fetched url
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Payload for recording a newly read book
pub struct NewBookRequest {
    pub isbn: Isbn,
    pub title: String,
    #[serde(rename = "dateRead")]
    pub date_read: NaiveDate,
    pub recommendation: i32,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ListBooksResponse {
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Message body carried by deletion responses and client errors
pub struct ApiMessage {
    pub message: String,
}
