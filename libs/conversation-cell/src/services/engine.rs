use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use messaging_cell::{ListRow, ListSection, MessageSender, ReplyButton};

use crate::catalog;
use crate::error::ConversationError;
use crate::models::{ConversationState, ConversationStep, Language, StateUpdate};
use crate::services::language::{KeywordLanguageDetector, LanguageDetector};
use crate::services::store::ConversationStore;
use crate::texts;

const DEFAULT_RETENTION: Duration = Duration::from_secs(3600);

/// The booking conversation state machine.
///
/// Interprets each inbound utterance against the sender's current state,
/// decides the outbound messages, and advances (or holds) the step. Both the
/// store and the gateway are injected so tests can run against fakes and
/// multiple isolated engines.
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    sender: Arc<dyn MessageSender>,
    detector: Box<dyn LanguageDetector>,
    retention: Duration,
    session_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationEngine {
    pub fn new(store: Arc<dyn ConversationStore>, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            store,
            sender,
            detector: Box::new(KeywordLanguageDetector),
            retention: DEFAULT_RETENTION,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Handle one normalized utterance from `phone_number`.
    ///
    /// This is the per-message failure boundary: nothing escapes it. Any
    /// error is converted into the generic localized notice, and state is
    /// preserved as committed before the failure.
    pub async fn handle_message(&self, phone_number: &str, utterance: &str) {
        let guard = self.session_guard(phone_number).await;

        if let Err(err) = self.dispatch(phone_number, utterance).await {
            warn!("Message handling failed for {}: {}", phone_number, err);

            let language = match self.store.get(phone_number).await {
                Some(state) => state.language,
                None => Language::En,
            };
            if let Err(send_err) = self
                .sender
                .send_text(phone_number, texts::generic_error(language))
                .await
            {
                warn!(
                    "Could not deliver error notice to {}: {}",
                    phone_number, send_err
                );
            }
        }

        drop(guard);
        self.release_session_lock(phone_number).await;
    }

    /// Serialize handling per phone number so two near-simultaneous messages
    /// from one sender cannot race on the same record. Distinct numbers
    /// proceed concurrently.
    async fn session_guard(&self, phone_number: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.session_locks.lock().await;
            locks
                .entry(phone_number.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry once nobody else holds or awaits it, so the map
    /// does not accumulate one entry per phone number ever seen.
    async fn release_session_lock(&self, phone_number: &str) {
        let mut locks = self.session_locks.lock().await;
        // A strong count of one means the map entry is the only remaining
        // holder; any concurrent message for this number keeps its own
        // clone alive.
        let unused = locks
            .get(phone_number)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if unused {
            locks.remove(phone_number);
        }
    }

    #[cfg(test)]
    async fn session_lock_count(&self) -> usize {
        self.session_locks.lock().await.len()
    }

    async fn dispatch(&self, phone_number: &str, utterance: &str) -> Result<(), ConversationError> {
        let state = self.store.get_or_create(phone_number).await;
        debug!(
            "Handling message for {} at step {:?}",
            phone_number, state.step
        );

        match state.step {
            ConversationStep::Greeting => self.handle_greeting(phone_number, utterance).await,
            ConversationStep::DoctorSelection => self.handle_doctor_selection(&state, utterance).await,
            ConversationStep::SlotSelection => self.handle_slot_selection(&state, utterance).await,
            ConversationStep::Completed => self.handle_completed(&state).await,
        }
    }

    async fn handle_greeting(
        &self,
        phone_number: &str,
        utterance: &str,
    ) -> Result<(), ConversationError> {
        // Language is detected once here and fixed for the session.
        let language = self.detector.detect(utterance);

        self.store
            .upsert(
                phone_number,
                StateUpdate {
                    language: Some(language),
                    step: Some(ConversationStep::DoctorSelection),
                    ..Default::default()
                },
            )
            .await;

        let rows: Vec<ListRow> = catalog::DOCTORS
            .iter()
            .map(|d| {
                ListRow::new(d.id, d.localized_name(language))
                    .with_description(d.localized_specialty(language))
            })
            .collect();
        let sections = vec![ListSection::new(texts::doctor_section_title(language), rows)];

        self.sender
            .send_list(
                phone_number,
                texts::greeting(language),
                texts::doctor_list_button(language),
                &sections,
            )
            .await?;

        Ok(())
    }

    async fn handle_doctor_selection(
        &self,
        state: &ConversationState,
        utterance: &str,
    ) -> Result<(), ConversationError> {
        let Some(doctor) = catalog::resolve_doctor(utterance) else {
            self.sender
                .send_text(&state.phone_number, texts::invalid_selection(state.language))
                .await?;
            return Ok(());
        };

        self.store
            .upsert(
                &state.phone_number,
                StateUpdate {
                    selected_doctor: Some(doctor.id.to_string()),
                    step: Some(ConversationStep::SlotSelection),
                    ..Default::default()
                },
            )
            .await;

        let buttons: Vec<ReplyButton> = catalog::offered_slots()
            .iter()
            .map(|s| ReplyButton::new(s.id, s.display))
            .collect();

        self.sender
            .send_buttons(
                &state.phone_number,
                texts::slot_prompt(state.language),
                &buttons,
            )
            .await?;

        Ok(())
    }

    async fn handle_slot_selection(
        &self,
        state: &ConversationState,
        utterance: &str,
    ) -> Result<(), ConversationError> {
        let Some(slot) = catalog::resolve_slot(utterance) else {
            self.sender
                .send_text(&state.phone_number, texts::invalid_selection(state.language))
                .await?;
            return Ok(());
        };

        let doctor_id = state.selected_doctor.as_deref().unwrap_or_default();
        let Some(doctor) = catalog::doctor_by_id(doctor_id) else {
            return Err(ConversationError::InconsistentState(format!(
                "slot chosen but doctor {:?} not in catalog",
                state.selected_doctor
            )));
        };

        self.store
            .upsert(
                &state.phone_number,
                StateUpdate {
                    selected_slot: Some(slot.id.to_string()),
                    ..Default::default()
                },
            )
            .await;

        let reference = new_booking_reference();
        let payload = json!({
            "appointment_id": reference,
            "phone": state.phone_number,
            "doctor_id": doctor.id,
            "slot": slot.id,
            "date": Utc::now().format("%Y-%m-%d").to_string(),
        });

        self.sender
            .send_text(
                &state.phone_number,
                &texts::confirmation(
                    state.language,
                    doctor.localized_name(state.language),
                    slot.display,
                    doctor.address,
                ),
            )
            .await?;

        self.sender
            .send_qr_image(
                &state.phone_number,
                &payload.to_string(),
                &texts::qr_caption(state.language, &reference),
            )
            .await?;

        self.store
            .upsert(
                &state.phone_number,
                StateUpdate {
                    step: Some(ConversationStep::Completed),
                    ..Default::default()
                },
            )
            .await;
        self.store
            .expire_after(&state.phone_number, self.retention)
            .await;

        debug!(
            "Booking {} confirmed for {} ({} at {})",
            reference, state.phone_number, doctor.id, slot.id
        );

        Ok(())
    }

    async fn handle_completed(&self, state: &ConversationState) -> Result<(), ConversationError> {
        // No rebook trigger is wired up yet; the notice text is static.
        self.sender
            .send_text(&state.phone_number, texts::already_confirmed(state.language))
            .await?;
        Ok(())
    }
}

fn new_booking_reference() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("APT-{}", id[..8].to_uppercase())
}
