//! API handlers for the bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{config::CorsConfig, AppState};

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::add_book))
        .route("/books/:book_id", get(books::get_book))
        .route("/books/:book_id", put(books::update_book))
        .route("/books/:book_id", delete(books::delete_book))
        .with_state(state);

    routes.merge(openapi::create_openapi_router())
}

/// Build the CORS layer from configuration
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allows_any() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
