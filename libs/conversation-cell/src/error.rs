use thiserror::Error;

use messaging_cell::GatewayError;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Delivery failed: {0}")]
    Delivery(#[from] GatewayError),

    #[error("Inconsistent conversation state: {0}")]
    InconsistentState(String),
}
