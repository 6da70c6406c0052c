use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tracing::debug;

use crate::models::{ConversationState, ConversationStep, StateUpdate};

/// Keyed persistence of conversation state by phone number.
///
/// The engine depends only on this interface; the in-memory implementation
/// below is an ephemeral cache, and a deployment that needs state to survive
/// restarts or span instances backs this trait with a durable keyed store.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, phone_number: &str) -> Option<ConversationState>;

    /// Always returns a state, lazily creating the greeting/default record
    /// for an unseen phone number. Never duplicates an existing record.
    async fn get_or_create(&self, phone_number: &str) -> ConversationState;

    /// Merge the given fields into the existing record (creating it first if
    /// absent) and return the result.
    async fn upsert(&self, phone_number: &str, update: StateUpdate) -> ConversationState;

    async fn delete(&self, phone_number: &str);

    /// Schedule deletion of a completed conversation after `retention`.
    async fn expire_after(&self, phone_number: &str, retention: Duration);
}

#[derive(Default)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_update(state: &mut ConversationState, update: StateUpdate) {
    if let Some(step) = update.step {
        state.step = step;
    }
    if let Some(language) = update.language {
        state.language = language;
    }
    if let Some(doctor) = update.selected_doctor {
        state.selected_doctor = Some(doctor);
    }
    if let Some(slot) = update.selected_slot {
        state.selected_slot = Some(slot);
    }
    if let Some(name) = update.patient_name {
        state.patient_name = Some(name);
    }
    state.updated_at = Utc::now();
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, phone_number: &str) -> Option<ConversationState> {
        self.states.read().await.get(phone_number).cloned()
    }

    async fn get_or_create(&self, phone_number: &str) -> ConversationState {
        let mut states = self.states.write().await;
        states
            .entry(phone_number.to_string())
            .or_insert_with(|| ConversationState::new(phone_number))
            .clone()
    }

    async fn upsert(&self, phone_number: &str, update: StateUpdate) -> ConversationState {
        let mut states = self.states.write().await;
        let state = states
            .entry(phone_number.to_string())
            .or_insert_with(|| ConversationState::new(phone_number));
        apply_update(state, update);
        state.clone()
    }

    async fn delete(&self, phone_number: &str) {
        self.states.write().await.remove(phone_number);
    }

    async fn expire_after(&self, phone_number: &str, retention: Duration) {
        let states = self.states.clone();
        let phone_number = phone_number.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(retention).await;

            let mut states = states.write().await;
            // Only reap records still sitting in Completed; anything else
            // means a fresh session has taken over the key.
            if states
                .get(&phone_number)
                .is_some_and(|s| s.step == ConversationStep::Completed)
            {
                debug!("Expiring completed conversation for {}", phone_number);
                states.remove(&phone_number);
            }
        });
    }
}
