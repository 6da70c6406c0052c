use serde::Deserialize;

/// Inbound WhatsApp Business webhook payload, reduced to the fields the
/// ingress handler consumes. Unknown fields are ignored by serde.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub interactive: Option<InteractivePayload>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractivePayload {
    #[serde(default)]
    pub button_reply: Option<InteractiveReply>,
    #[serde(default)]
    pub list_reply: Option<InteractiveReply>,
}

#[derive(Debug, Deserialize)]
pub struct InteractiveReply {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Uniform user-utterance shape the state machine consumes: free-typed text
/// and interactive-reply ids are normalized here so the engine never sees
/// transport payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub sender: String,
    pub utterance: String,
}

impl InboundMessage {
    /// Normalize a text or interactive message; anything else is a no-op.
    pub fn normalize(&self) -> Option<NormalizedMessage> {
        let utterance = match self.kind.as_str() {
            "text" => self.text.as_ref().map(|t| t.body.clone()),
            "interactive" => self.interactive.as_ref().and_then(|i| {
                i.button_reply
                    .as_ref()
                    .or(i.list_reply.as_ref())
                    .map(|r| r.id.clone())
            }),
            _ => None,
        }?;

        Some(NormalizedMessage {
            sender: self.from.clone(),
            utterance,
        })
    }
}
