use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Duration;

use conversation_cell::{
    ConversationEngine, ConversationStep, ConversationStore, InMemoryConversationStore, Language,
    StateUpdate,
};
use messaging_cell::{GatewayError, ListSection, MessageSender, ReplyButton};

#[derive(Debug, Clone)]
enum Sent {
    Text {
        to: String,
        body: String,
    },
    Buttons {
        to: String,
        buttons: Vec<ReplyButton>,
    },
    List {
        to: String,
        sections: Vec<ListSection>,
    },
    Qr {
        to: String,
        payload: String,
        caption: String,
    },
}

/// In-memory gateway fake recording every outbound intent, optionally
/// failing all sends to exercise the engine's failure boundary.
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<Sent>>,
    fail_sends: AtomicBool,
}

impl RecordingSender {
    async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    fn fail_all_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            Err(GatewayError::Api {
                status: 500,
                message: "provider down".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), GatewayError> {
        self.check()?;
        self.sent.lock().await.push(Sent::Text {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn send_buttons(
        &self,
        to: &str,
        _body: &str,
        buttons: &[ReplyButton],
    ) -> Result<(), GatewayError> {
        self.check()?;
        self.sent.lock().await.push(Sent::Buttons {
            to: to.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(())
    }

    async fn send_list(
        &self,
        to: &str,
        _body: &str,
        _button_label: &str,
        sections: &[ListSection],
    ) -> Result<(), GatewayError> {
        self.check()?;
        self.sent.lock().await.push(Sent::List {
            to: to.to_string(),
            sections: sections.to_vec(),
        });
        Ok(())
    }

    async fn send_qr_image(
        &self,
        to: &str,
        payload: &str,
        caption: &str,
    ) -> Result<(), GatewayError> {
        self.check()?;
        self.sent.lock().await.push(Sent::Qr {
            to: to.to_string(),
            payload: payload.to_string(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

struct Harness {
    store: Arc<InMemoryConversationStore>,
    sender: Arc<RecordingSender>,
    engine: ConversationEngine,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryConversationStore::new());
    let sender = Arc::new(RecordingSender::default());
    let engine = ConversationEngine::new(store.clone(), sender.clone());
    Harness {
        store,
        sender,
        engine,
    }
}

const PHONE: &str = "+919000000001";

#[tokio::test]
async fn first_message_lists_doctors_in_catalog_order() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::DoctorSelection);
    assert_eq!(state.language, Language::En);

    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::List { to, sections } => {
            assert_eq!(to, PHONE);
            let ids: Vec<&str> = sections[0].rows.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["dr_verma", "dr_iyer", "dr_khan"]);
        }
        other => panic!("expected doctor list, got {:?}", other),
    }
}

#[tokio::test]
async fn language_detected_on_first_message_is_stable() {
    let h = harness();

    h.engine.handle_message(PHONE, "नमस्ते").await;
    assert_eq!(h.store.get(PHONE).await.unwrap().language, Language::Hi);

    // A later English message must not re-detect the language; the invalid
    // selection reply stays in Hindi.
    h.engine.handle_message(PHONE, "something invalid").await;
    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.language, Language::Hi);

    let sent = h.sender.sent().await;
    match &sent[1] {
        Sent::Text { body, .. } => assert!(body.contains("माफ़")),
        other => panic!("expected invalid-selection text, got {:?}", other),
    }
}

#[tokio::test]
async fn positional_doctor_selection_offers_slots() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "1").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::SlotSelection);
    assert_eq!(state.selected_doctor.as_deref(), Some("dr_verma"));

    let sent = h.sender.sent().await;
    match &sent[1] {
        Sent::Buttons { buttons, .. } => {
            assert!(buttons.len() <= 3);
            assert_eq!(buttons[0].id, "slot_0900");
        }
        other => panic!("expected slot buttons, got {:?}", other),
    }
}

#[tokio::test]
async fn doctor_selection_accepts_raw_id() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "dr_iyer").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.selected_doctor.as_deref(), Some("dr_iyer"));
    assert_eq!(state.step, ConversationStep::SlotSelection);
}

#[tokio::test]
async fn repeated_invalid_selections_never_advance() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "99").await;
    h.engine.handle_message(PHONE, "dr_nobody").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::DoctorSelection);
    assert_eq!(state.selected_doctor, None);
    assert_eq!(state.selected_slot, None);

    // One list message plus two invalid-selection texts, nothing else.
    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 3);
    assert!(matches!(sent[1], Sent::Text { .. }));
    assert!(matches!(sent[2], Sent::Text { .. }));
}

#[tokio::test]
async fn slot_display_string_completes_booking() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "1").await;
    h.engine.handle_message(PHONE, "10:30 AM").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::Completed);
    assert_eq!(state.selected_slot.as_deref(), Some("slot_1030"));

    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 4);
    match &sent[2] {
        Sent::Text { body, .. } => {
            assert!(body.contains("Dr. Anil Verma"));
            assert!(body.contains("10:30 AM"));
            assert!(body.contains("12 MG Road, Pune"));
        }
        other => panic!("expected confirmation text, got {:?}", other),
    }
    match &sent[3] {
        Sent::Qr {
            payload, caption, ..
        } => {
            let data: serde_json::Value = serde_json::from_str(payload).unwrap();
            assert_eq!(data["doctor_id"], "dr_verma");
            assert_eq!(data["slot"], "slot_1030");
            assert_eq!(data["phone"], PHONE);
            let reference = data["appointment_id"].as_str().unwrap();
            assert!(reference.starts_with("APT-"));
            assert!(caption.contains(reference));
        }
        other => panic!("expected QR image, got {:?}", other),
    }
}

#[tokio::test]
async fn slot_selection_is_case_sensitive() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "1").await;
    h.engine.handle_message(PHONE, "10:30 am").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::SlotSelection);
    assert_eq!(state.selected_slot, None);
}

#[tokio::test]
async fn slot_selection_accepts_slot_id() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "2").await;
    h.engine.handle_message(PHONE, "slot_1100").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::Completed);
    assert_eq!(state.selected_slot.as_deref(), Some("slot_1100"));
}

#[tokio::test]
async fn messages_after_completion_get_static_notice() {
    let h = harness();

    h.engine.handle_message(PHONE, "Hi").await;
    h.engine.handle_message(PHONE, "1").await;
    h.engine.handle_message(PHONE, "10:30 AM").await;
    h.engine.handle_message(PHONE, "anything").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::Completed);
    assert_eq!(state.selected_doctor.as_deref(), Some("dr_verma"));

    let sent = h.sender.sent().await;
    match sent.last().unwrap() {
        Sent::Text { body, .. } => assert!(body.contains("already confirmed")),
        other => panic!("expected already-confirmed notice, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn completed_session_expires_and_restarts_fresh() {
    let store = Arc::new(InMemoryConversationStore::new());
    let sender = Arc::new(RecordingSender::default());
    let engine = ConversationEngine::new(store.clone(), sender.clone())
        .with_retention(Duration::from_secs(60));

    engine.handle_message(PHONE, "Hi").await;
    engine.handle_message(PHONE, "1").await;
    engine.handle_message(PHONE, "10:30 AM").await;
    // Let the spawned timer task register its sleep before the clock moves.
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_secs(61)).await;
    tokio::task::yield_now().await;
    assert!(store.get(PHONE).await.is_none());

    // A new message starts a fresh greeting cycle.
    engine.handle_message(PHONE, "Hello again").await;
    let state = store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::DoctorSelection);
    assert_eq!(state.selected_doctor, None);
    assert!(matches!(sender.sent().await.last().unwrap(), Sent::List { .. }));
}

#[tokio::test]
async fn missing_doctor_record_sends_generic_error_without_transition() {
    let h = harness();

    // Force an inconsistent record: slot selection reached with a doctor id
    // that is not in the catalog.
    h.store
        .upsert(
            PHONE,
            StateUpdate {
                step: Some(ConversationStep::SlotSelection),
                selected_doctor: Some("dr_ghost".to_string()),
                ..Default::default()
            },
        )
        .await;

    h.engine.handle_message(PHONE, "10:30 AM").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::SlotSelection);

    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { body, .. } => assert!(body.contains("something went wrong")),
        other => panic!("expected generic error text, got {:?}", other),
    }
}

#[tokio::test]
async fn concurrent_messages_for_one_number_are_serialized() {
    let h = harness();

    // Two near-simultaneous messages from the same number: the per-phone
    // guard forces them through one at a time, so exactly one greeting
    // cycle runs and the other message is handled against the advanced
    // step.
    tokio::join!(
        h.engine.handle_message(PHONE, "Hi"),
        h.engine.handle_message(PHONE, "Hi"),
    );

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::DoctorSelection);

    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 2);
    let lists = sent
        .iter()
        .filter(|s| matches!(s, Sent::List { .. }))
        .count();
    assert_eq!(lists, 1, "only the first message may run the greeting");
}

#[tokio::test]
async fn delivery_failure_is_contained_at_the_boundary() {
    let h = harness();
    h.sender.fail_all_sends();

    // Must neither panic nor propagate; committed state survives.
    h.engine.handle_message(PHONE, "Hi").await;

    let state = h.store.get(PHONE).await.unwrap();
    assert_eq!(state.step, ConversationStep::DoctorSelection);
    assert!(h.sender.sent().await.is_empty());
}
