//! Localized user-facing message templates.
//!
//! Every failure path must resolve to one of these short friendly strings;
//! raw error details never reach the end user.

use crate::models::Language;

pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::Hi => "नमस्ते! अपॉइंटमेंट बुक करने के लिए कृपया एक डॉक्टर चुनें।",
        Language::Mr => "नमस्कार! अपॉइंटमेंट बुक करण्यासाठी कृपया एक डॉक्टर निवडा.",
        Language::En => "Hello! Please choose a doctor to book an appointment.",
    }
}

pub fn doctor_list_button(language: Language) -> &'static str {
    match language {
        Language::Hi => "डॉक्टर देखें",
        Language::Mr => "डॉक्टर पहा",
        Language::En => "View doctors",
    }
}

pub fn doctor_section_title(language: Language) -> &'static str {
    match language {
        Language::Hi => "उपलब्ध डॉक्टर",
        Language::Mr => "उपलब्ध डॉक्टर",
        Language::En => "Available doctors",
    }
}

pub fn slot_prompt(language: Language) -> &'static str {
    match language {
        Language::Hi => "कृपया अपॉइंटमेंट का समय चुनें:",
        Language::Mr => "कृपया अपॉइंटमेंटची वेळ निवडा:",
        Language::En => "Please pick an appointment time:",
    }
}

pub fn invalid_selection(language: Language) -> &'static str {
    match language {
        Language::Hi => "माफ़ कीजिए, यह विकल्प समझ नहीं आया। कृपया सूची में से चुनें।",
        Language::Mr => "क्षमस्व, हा पर्याय समजला नाही. कृपया यादीतून निवडा.",
        Language::En => "Sorry, that wasn't a valid option. Please choose from the list.",
    }
}

pub fn generic_error(language: Language) -> &'static str {
    match language {
        Language::Hi => "माफ़ कीजिए, कुछ गड़बड़ हो गई। कृपया थोड़ी देर बाद फिर कोशिश करें।",
        Language::Mr => "क्षमस्व, काहीतरी चूक झाली. कृपया थोड्या वेळाने पुन्हा प्रयत्न करा.",
        Language::En => "Sorry, something went wrong. Please try again in a moment.",
    }
}

pub fn already_confirmed(language: Language) -> &'static str {
    match language {
        Language::Hi => "आपका अपॉइंटमेंट पहले से बुक है। नई बुकिंग के लिए 'book' लिखें।",
        Language::Mr => "तुमची अपॉइंटमेंट आधीच बुक आहे. नवीन बुकिंगसाठी 'book' लिहा.",
        Language::En => "Your appointment is already confirmed. Type 'book' to make a new booking.",
    }
}

pub fn confirmation(
    language: Language,
    doctor_name: &str,
    slot_display: &str,
    address: &str,
) -> String {
    match language {
        Language::Hi => format!(
            "आपका अपॉइंटमेंट बुक हो गया है!\nडॉक्टर: {}\nसमय: {}\nपता: {}",
            doctor_name, slot_display, address
        ),
        Language::Mr => format!(
            "तुमची अपॉइंटमेंट बुक झाली आहे!\nडॉक्टर: {}\nवेळ: {}\nपत्ता: {}",
            doctor_name, slot_display, address
        ),
        Language::En => format!(
            "Your appointment is booked!\nDoctor: {}\nTime: {}\nAddress: {}",
            doctor_name, slot_display, address
        ),
    }
}

pub fn qr_caption(language: Language, reference: &str) -> String {
    match language {
        Language::Hi => format!("अपॉइंटमेंट पास {} — क्लिनिक पर यह QR कोड दिखाएँ।", reference),
        Language::Mr => format!("अपॉइंटमेंट पास {} — क्लिनिकमध्ये हा QR कोड दाखवा.", reference),
        Language::En => format!("Appointment pass {} — show this QR code at the clinic.", reference),
    }
}
