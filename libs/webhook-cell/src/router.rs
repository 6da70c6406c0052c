use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use conversation_cell::ConversationEngine;
use shared_config::AppConfig;

use crate::handlers;

pub struct WebhookState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<ConversationEngine>,
}

pub fn webhook_routes(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .with_state(state)
}
