use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a single phone number's booking dialogue.
///
/// Steps only ever move forward; the only way back to `Greeting` is deletion
/// of the whole record (session reset via the retention timer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    Greeting,
    DoctorSelection,
    SlotSelection,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hi,
    Mr,
    En,
}

/// One conversation record per phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub phone_number: String,
    pub step: ConversationStep,
    pub language: Language,
    pub selected_doctor: Option<String>,
    pub selected_slot: Option<String>,
    /// Reserved; not populated by the current flow.
    pub patient_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(phone_number: &str) -> Self {
        let now = Utc::now();
        Self {
            phone_number: phone_number.to_string(),
            step: ConversationStep::Greeting,
            language: Language::En,
            selected_doctor: None,
            selected_slot: None,
            patient_name: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update merged into an existing record by the store.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub step: Option<ConversationStep>,
    pub language: Option<Language>,
    pub selected_doctor: Option<String>,
    pub selected_slot: Option<String>,
    pub patient_name: Option<String>,
}
