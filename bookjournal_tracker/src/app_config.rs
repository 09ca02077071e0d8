use paperclip::actix::web;

use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(web::resource("/").route(web::get().to(handlers::list_books)))
        .service(web::resource("/Newbooks").route(web::post().to(handlers::add_book)))
        .service(
            web::scope("/books")
                .service(
                    web::resource("/sortedByRating")
                        .route(web::get().to(handlers::list_books_by_rating)),
                )
                .service(
                    web::resource("/sortedByRecency")
                        .route(web::get().to(handlers::list_books_by_recency)),
                )
                .service(web::resource("/{isbn}").route(web::delete().to(handlers::delete_book))),
        );
}
