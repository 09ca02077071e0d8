use std::env;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime::TokioCurrentThread;
use paperclip::actix::{OpenApiExt, web};
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, Registry};
use tracing_subscriber::layer::SubscriberExt;

use bookjournal_tracker::app_config::config_app;
use bookjournal_tracker::books_repository::{
    BooksRepository, InMemoryBooksRepository, PostgresBooksRepository,
    PostgresBooksRepositoryConfig,
};
use bookjournal_tracker::cover_image_provider::{
    CoverImageSource, OpenLibraryCoverProvider, DEFAULT_CATALOG_URL, DEFAULT_COVERS_URL,
};

// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
fn init_telemetry() {
    let app_name = "bookjournal_tracker";

    // Start a new Jaeger trace pipeline.
    // Spans are exported in batch - recommended setup for a production application.
    global::set_text_map_propagator(TraceContextPropagator::new());
    #[allow(deprecated)]
    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(app_name)
        .install_batch(TokioCurrentThread)
        .expect("Failed to install OpenTelemetry tracer.");

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    // Create a `tracing` layer using the Jaeger tracer
    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);
    // Create a `tracing` layer to emit spans as structured logs to stdout
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    // Combined them all together in a `tracing` subscriber
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();
    println!("starting HTTP server at http://localhost:8080");

    let use_in_memory_db = env::var("USE_IN_MEMORY_DB")
        .map(|value| value.to_lowercase() == "true")
        .unwrap_or_default();
    let pg_hostname = env::var("DB_HOST").unwrap_or("127.0.0.1".to_string());
    let pg_username = env::var("DB_USER").unwrap_or("postgres".to_string());
    let pg_password = env::var("DB_PASSWORD").unwrap_or("postgres".to_string());
    let pg_database = env::var("DB_NAME").unwrap_or("postgres".to_string());
    let catalog_url = env::var("OPENLIBRARY_API_URL").unwrap_or(DEFAULT_CATALOG_URL.to_string());
    let covers_url = env::var("OPENLIBRARY_COVERS_URL").unwrap_or(DEFAULT_COVERS_URL.to_string());

    // The public catalog endpoints answer without a key
    if env::var("BOOK_API_KEY").is_ok() {
        tracing::debug!("BOOK_API_KEY is set, catalog requests are sent without it");
    }

    let books_repository: Arc<dyn BooksRepository> = if use_in_memory_db {
        Arc::new(InMemoryBooksRepository::default())
    } else {
        Arc::new(
            PostgresBooksRepository::init(PostgresBooksRepositoryConfig {
                hostname: pg_hostname,
                username: pg_username,
                password: pg_password,
                database: pg_database,
            })
            .await
            .expect("Failed to init postgres"),
        )
    };

    let cover_images: Arc<dyn CoverImageSource> = Arc::new(
        OpenLibraryCoverProvider::new(catalog_url, covers_url)
            .expect("Failed to init cover image provider"),
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .app_data(web::Data::new(cover_images.clone()))
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
