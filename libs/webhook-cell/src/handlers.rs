use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use messaging_cell::verify_subscription;
use shared_models::AppError;

use crate::models::WebhookPayload;
use crate::router::WebhookState;

const WEBHOOK_OBJECT: &str = "whatsapp_business_account";

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
}

/// Provider subscription handshake (GET): echo the challenge when the mode
/// is "subscribe" and the token matches the configured secret.
#[axum::debug_handler]
pub async fn verify_webhook(
    State(state): State<Arc<WebhookState>>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    let mode = params.mode.as_deref().unwrap_or_default();
    let token = params.verify_token.as_deref().unwrap_or_default();
    let challenge = params.challenge.as_deref().unwrap_or_default();

    match verify_subscription(mode, token, challenge, &state.config.whatsapp_verify_token) {
        Some(challenge) => {
            info!("Webhook subscription verified");
            Ok(challenge.to_string())
        }
        None => Err(AppError::Auth("Webhook verification failed".to_string())),
    }
}

/// Inbound event ingress (POST): validate the top-level discriminator, then
/// feed each normalized message to the conversation engine in delivery
/// order. Each message is isolated; a failure never stops the rest of the
/// payload.
#[axum::debug_handler]
pub async fn receive_webhook(
    State(state): State<Arc<WebhookState>>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<Value>, AppError> {
    if payload.object != WEBHOOK_OBJECT {
        warn!("Rejecting webhook with object '{}'", payload.object);
        return Err(AppError::BadRequest(
            "Unrecognized webhook object".to_string(),
        ));
    }

    for entry in &payload.entry {
        for change in &entry.changes {
            if change.field.as_deref() != Some("messages") {
                continue;
            }
            let Some(value) = &change.value else {
                continue;
            };

            for message in &value.messages {
                let Some(normalized) = message.normalize() else {
                    debug!("Ignoring unsupported message type '{}'", message.kind);
                    continue;
                };

                // The engine owns the per-message failure boundary; by the
                // time control returns here the message is fully handled.
                state
                    .engine
                    .handle_message(&normalized.sender, &normalized.utterance)
                    .await;
            }
        }
    }

    Ok(Json(json!({ "status": "received" })))
}
