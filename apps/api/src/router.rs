use std::sync::Arc;

use axum::{routing::get, Router};

use webhook_cell::{webhook_routes, WebhookState};

pub fn create_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Booking bot API is running!" }))
        .nest("/webhook", webhook_routes(state))
}
