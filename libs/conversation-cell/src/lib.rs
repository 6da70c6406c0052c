pub mod catalog;
pub mod error;
pub mod models;
pub mod services;
pub mod texts;

pub use error::ConversationError;
pub use models::{ConversationState, ConversationStep, Language, StateUpdate};
pub use services::engine::ConversationEngine;
pub use services::language::{KeywordLanguageDetector, LanguageDetector};
pub use services::store::{ConversationStore, InMemoryConversationStore};
