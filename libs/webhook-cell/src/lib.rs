pub mod handlers;
pub mod models;
pub mod router;

pub use models::{NormalizedMessage, WebhookPayload};
pub use router::{webhook_routes, WebhookState};
