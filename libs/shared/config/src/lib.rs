use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub whatsapp_access_token: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_verify_token: String,
    pub whatsapp_api_base_url: String,
    pub qr_render_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            whatsapp_access_token: env::var("WHATSAPP_ACCESS_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_ACCESS_TOKEN not set, using empty value");
                    String::new()
                }),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_PHONE_NUMBER_ID not set, using empty value");
                    String::new()
                }),
            whatsapp_verify_token: env::var("WHATSAPP_VERIFY_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_VERIFY_TOKEN not set, using empty value");
                    String::new()
                }),
            whatsapp_api_base_url: env::var("WHATSAPP_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("WHATSAPP_API_BASE_URL not set, using default");
                    "https://graph.facebook.com/v18.0".to_string()
                }),
            qr_render_base_url: env::var("QR_RENDER_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("QR_RENDER_BASE_URL not set, using default");
                    "https://api.qrserver.com/v1/create-qr-code/".to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.whatsapp_access_token.is_empty()
            && !self.whatsapp_phone_number_id.is_empty()
            && !self.whatsapp_verify_token.is_empty()
    }
}
