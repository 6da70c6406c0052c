use crate::models::Language;

/// Pluggable language detection strategy, applied once to the first inbound
/// message of a session.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Language;
}

/// Keyword heuristic over small fixed Hindi and Marathi word sets; anything
/// that matches neither falls through to English. This is a heuristic, not a
/// classifier, and does not generalize beyond the configured sets.
pub struct KeywordLanguageDetector;

const HINDI_KEYWORDS: &[&str] = &[
    "नमस्ते",
    "हिंदी",
    "अपॉइंटमेंट",
    "डॉक्टर",
    "namaste",
    "hindi",
];

const MARATHI_KEYWORDS: &[&str] = &[
    "नमस्कार",
    "मराठी",
    "भेट",
    "वेळ",
    "namaskar",
    "marathi",
];

impl LanguageDetector for KeywordLanguageDetector {
    fn detect(&self, text: &str) -> Language {
        let text = text.to_lowercase();

        // Hindi is evaluated first: a message matching both keyword sets
        // resolves to Hindi.
        if HINDI_KEYWORDS.iter().any(|k| text.contains(k)) {
            Language::Hi
        } else if MARATHI_KEYWORDS.iter().any(|k| text.contains(k)) {
            Language::Mr
        } else {
            Language::En
        }
    }
}
