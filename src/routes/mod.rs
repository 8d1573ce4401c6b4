use axum::extract::DefaultBodyLimit;
use axum::routing::{get, get_service};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::events::{
    create_event, delete_event, get_event, list_categories, list_events, update_event,
};
use crate::handlers::health_check;
use crate::AppState;

/// Inline base64 images arrive in the request body, so the limit is far
/// above axum's default.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let views = config.views_dir.as_path();

    Router::new()
        .route("/health", get(health_check))
        .route("/api/categories", get(list_categories))
        .route("/api/events", get(list_events))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/add-event",
            get_service(ServeFile::new(views.join("add-event.html"))).post(create_event),
        )
        .route(
            "/edit-event/:id",
            get_service(ServeFile::new(views.join("edit-event.html"))),
        )
        .route(
            "/view-event",
            get_service(ServeFile::new(views.join("view-event.html"))),
        )
        .route("/", get_service(ServeFile::new(views.join("index.html"))))
        // everything else (uploads included) is a public asset
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
