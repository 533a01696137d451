use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::receive_event;
use crate::health::health;

/// Build the application router.
///
/// The receiver answers any method on `/` and acts as the fallback for every
/// other path, so a push subscription configured with a path suffix still
/// lands on it.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", any(receive_event))
        .fallback(receive_event)
        .layer(TraceLayer::new_for_http())
}
