use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub verify_token: String,
    pub api_base_url: String,
    pub qr_render_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            verify_token: "test-verify-secret".to_string(),
            api_base_url: "http://localhost:54321".to_string(),
            qr_render_base_url: "https://qr.example.com/render".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            whatsapp_access_token: "test-token".to_string(),
            whatsapp_phone_number_id: "556677".to_string(),
            whatsapp_verify_token: self.verify_token.clone(),
            whatsapp_api_base_url: self.api_base_url.clone(),
            qr_render_base_url: self.qr_render_base_url.clone(),
        }
    }
}

/// Webhook delivery carrying a single plain-text message.
pub fn text_message_payload(from: &str, body: &str) -> Value {
    messages_payload(vec![json!({
        "from": from,
        "id": "wamid.test",
        "type": "text",
        "text": { "body": body }
    })])
}

/// Webhook delivery carrying a single interactive list reply.
pub fn list_reply_payload(from: &str, reply_id: &str, title: &str) -> Value {
    messages_payload(vec![json!({
        "from": from,
        "id": "wamid.test",
        "type": "interactive",
        "interactive": {
            "type": "list_reply",
            "list_reply": { "id": reply_id, "title": title }
        }
    })])
}

/// Webhook delivery carrying a single interactive button reply.
pub fn button_reply_payload(from: &str, reply_id: &str, title: &str) -> Value {
    messages_payload(vec![json!({
        "from": from,
        "id": "wamid.test",
        "type": "interactive",
        "interactive": {
            "type": "button_reply",
            "button_reply": { "id": reply_id, "title": title }
        }
    })])
}

/// Webhook delivery wrapping the given raw message objects in the standard
/// entry/changes envelope.
pub fn messages_payload(messages: Vec<Value>) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "entry-1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": messages
                }
            }]
        }]
    })
}
