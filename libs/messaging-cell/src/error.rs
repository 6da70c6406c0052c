use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WhatsApp API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid outbound payload: {0}")]
    InvalidPayload(String),
}
