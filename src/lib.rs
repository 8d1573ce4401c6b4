pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod uploads;
pub mod utils;

use store::EventStore;
use uploads::ImageStore;

/// Shared handler state: the store handle and the image materializer,
/// both constructed in `main` and injected through the router.
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    pub images: ImageStore,
}
