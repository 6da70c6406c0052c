use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::GatewayError;
use crate::models::{ListSection, ReplyButton};

/// Outbound messaging intents the conversation engine can request.
///
/// The gateway does not retry or queue; a failed send is reported to the
/// caller as a `GatewayError` and left there.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError>;

    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[ReplyButton],
    ) -> Result<(), GatewayError>;

    async fn send_list(
        &self,
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
    ) -> Result<(), GatewayError>;

    /// Deliver an arbitrary string payload as a QR image with a caption.
    ///
    /// The payload is URL-encoded into an external QR renderer's query
    /// string; the gateway never generates image bytes itself.
    async fn send_qr_image(
        &self,
        to: &str,
        payload: &str,
        caption: &str,
    ) -> Result<(), GatewayError>;
}

pub struct WhatsAppGateway {
    client: Client,
    base_url: String,
    access_token: String,
    phone_number_id: String,
    qr_render_base_url: String,
}

impl WhatsAppGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.whatsapp_api_base_url.clone(),
            access_token: config.whatsapp_access_token.clone(),
            phone_number_id: config.whatsapp_phone_number_id.clone(),
            qr_render_base_url: config.qr_render_base_url.clone(),
        }
    }

    async fn post_message(&self, body: Value) -> Result<(), GatewayError> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        debug!("Posting WhatsApp message to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("WhatsApp API error ({}): {}", status, error_text);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(())
    }

    fn qr_link(&self, payload: &str) -> Result<String, GatewayError> {
        let url = Url::parse_with_params(
            &self.qr_render_base_url,
            &[("size", "300x300"), ("data", payload)],
        )
        .map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl MessageSender for WhatsAppGateway {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": body }
        }))
        .await
    }

    async fn send_buttons(
        &self,
        to: &str,
        body: &str,
        buttons: &[ReplyButton],
    ) -> Result<(), GatewayError> {
        let buttons: Vec<Value> = buttons
            .iter()
            .map(|b| {
                json!({
                    "type": "reply",
                    "reply": { "id": b.id, "title": b.title }
                })
            })
            .collect();

        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": body },
                "action": { "buttons": buttons }
            }
        }))
        .await
    }

    async fn send_list(
        &self,
        to: &str,
        body: &str,
        button_label: &str,
        sections: &[ListSection],
    ) -> Result<(), GatewayError> {
        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "list",
                "body": { "text": body },
                "action": {
                    "button": button_label,
                    "sections": sections
                }
            }
        }))
        .await
    }

    async fn send_qr_image(
        &self,
        to: &str,
        payload: &str,
        caption: &str,
    ) -> Result<(), GatewayError> {
        let link = self.qr_link(payload)?;

        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "image",
            "image": { "link": link, "caption": caption }
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_gateway() -> WhatsAppGateway {
        WhatsAppGateway::new(&AppConfig {
            whatsapp_access_token: "test-token".to_string(),
            whatsapp_phone_number_id: "12345".to_string(),
            whatsapp_verify_token: "verify-secret".to_string(),
            whatsapp_api_base_url: "https://graph.example.com/v18.0".to_string(),
            qr_render_base_url: "https://qr.example.com/render".to_string(),
        })
    }

    #[test]
    fn qr_link_url_encodes_payload() {
        let gateway = test_gateway();
        let link = gateway
            .qr_link(r#"{"appointment_id":"APT-1","slot":"10:30 AM"}"#)
            .unwrap();

        assert!(link.starts_with("https://qr.example.com/render?size=300x300&data="));
        assert!(link.contains("%22appointment_id%22"));
        // Raw spaces and quotes must never survive encoding
        assert!(!link.contains(' '));
        assert!(!link.contains('"'));
    }
}
