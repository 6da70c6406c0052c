pub mod error;
pub mod models;
pub mod services;

pub use error::GatewayError;
pub use models::{ListRow, ListSection, ReplyButton};
pub use services::verification::verify_subscription;
pub use services::whatsapp::{MessageSender, WhatsAppGateway};
