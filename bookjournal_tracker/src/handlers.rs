use std::sync::Arc;

use actix_web::http::header::LOCATION;
use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::web::Data;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{ApiMessage, Isbn, ListBooksResponse, NewBookRequest};
use crate::books_repository::{BooksRepository, BooksRepositoryError, ListOrder};
use crate::cover_enrichment;
use crate::cover_image_provider::CoverImageSource;

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn list_books(
    books_repository: Data<Arc<dyn BooksRepository>>,
    cover_images: Data<Arc<dyn CoverImageSource>>,
) -> Result<HttpResponse, Error> {
    let books = match books_repository.list_books(ListOrder::Insertion).await {
        Ok(books) => books,
        Err(err) => {
            tracing::error!("List books failed {}", err);
            return Ok(HttpResponse::InternalServerError().finish());
        }
    };

    cover_enrichment::enrich_cover_images(
        books_repository.get_ref(),
        cover_images.get_ref(),
        &books,
    )
    .await;

    // The rows read before enrichment are what gets rendered
    Ok(HttpResponse::Ok().json(ListBooksResponse { books }))
}

#[api_v2_operation]
pub async fn list_books_by_rating(
    books_repository: Data<Arc<dyn BooksRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books(ListOrder::RatingDesc).await {
        Ok(books) => HttpResponse::Ok().json(ListBooksResponse { books }),
        Err(err) => {
            tracing::error!("List books by rating failed {}", err);
            HttpResponse::InternalServerError().finish()
        }
    })
}

#[api_v2_operation]
pub async fn list_books_by_recency(
    books_repository: Data<Arc<dyn BooksRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.list_books(ListOrder::RecencyDesc).await {
            Ok(books) => HttpResponse::Ok().json(ListBooksResponse { books }),
            Err(err) => {
                tracing::error!("List books by recency failed {}", err);
                HttpResponse::InternalServerError().finish()
            }
        },
    )
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BooksRepository>>,
    details: web::Json<NewBookRequest>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.add_book(details.into_inner()).await {
        Ok(()) => HttpResponse::Found()
            .append_header((LOCATION, "/"))
            .finish(),
        Err(BooksRepositoryError::AlreadyExists(_)) => {
            HttpResponse::BadRequest().json(ApiMessage {
                message: "Book with this ISBN already exists".to_string(),
            })
        }
        Err(err) => {
            tracing::error!("Add book failed {}", err);
            HttpResponse::InternalServerError().json(ApiMessage {
                message: "Internal server error".to_string(),
            })
        }
    })
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BooksRepository>>,
    isbn: web::Path<Isbn>,
) -> Result<HttpResponse, Error> {
    let isbn = isbn.into_inner();
    Ok(match books_repository.delete_book(&isbn).await {
        Ok(()) => HttpResponse::Ok().json(ApiMessage {
            message: format!("Book with ISBN {} deleted successfully", isbn),
        }),
        Err(BooksRepositoryError::NotFound(_)) => HttpResponse::NotFound().json(ApiMessage {
            message: "Book with this ISBN not found".to_string(),
        }),
        Err(err) => {
            tracing::error!("Delete book failed {}", err);
            HttpResponse::InternalServerError().json(ApiMessage {
                message: "Internal server error".to_string(),
            })
        }
    })
}

#[cfg(test)]
mod handler_tests {
    // Covered end to end by bookjournal_tests with the client feature
}
