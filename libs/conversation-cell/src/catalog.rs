//! Static reference data for the booking flow.
//!
//! The doctor catalog and the slot list are fixed in-memory tables; a
//! production deployment would source slots from a scheduling service, but
//! the conversation engine only needs lookup by id, by 1-based position and
//! by exact display string.

use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub name_local: &'static str,
    pub specialty: &'static str,
    pub specialty_local: &'static str,
    pub clinic: &'static str,
    pub address: &'static str,
}

impl Doctor {
    pub fn localized_name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name,
            Language::Hi | Language::Mr => self.name_local,
        }
    }

    pub fn localized_specialty(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.specialty,
            Language::Hi | Language::Mr => self.specialty_local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: &'static str,
    pub display: &'static str,
    pub available: bool,
}

/// Canonical catalog order; positional selection ("1".."3") indexes into
/// this list.
pub const DOCTORS: &[Doctor] = &[
    Doctor {
        id: "dr_verma",
        name: "Dr. Anil Verma",
        name_local: "डॉ. अनिल वर्मा",
        specialty: "General Physician",
        specialty_local: "सामान्य चिकित्सक",
        clinic: "Verma Clinic",
        address: "12 MG Road, Pune",
    },
    Doctor {
        id: "dr_iyer",
        name: "Dr. Meena Iyer",
        name_local: "डॉ. मीना अय्यर",
        specialty: "Pediatrician",
        specialty_local: "बाल रोग विशेषज्ञ",
        clinic: "Iyer Children's Clinic",
        address: "45 FC Road, Pune",
    },
    Doctor {
        id: "dr_khan",
        name: "Dr. Sameer Khan",
        name_local: "डॉ. समीर ख़ान",
        specialty: "Dermatologist",
        specialty_local: "त्वचा रोग विशेषज्ञ",
        clinic: "SkinCare Centre",
        address: "8 JM Road, Pune",
    },
];

pub const TIME_SLOTS: &[TimeSlot] = &[
    TimeSlot {
        id: "slot_0900",
        display: "9:00 AM",
        available: true,
    },
    TimeSlot {
        id: "slot_0930",
        display: "9:30 AM",
        available: false,
    },
    TimeSlot {
        id: "slot_1030",
        display: "10:30 AM",
        available: true,
    },
    TimeSlot {
        id: "slot_1100",
        display: "11:00 AM",
        available: true,
    },
    TimeSlot {
        id: "slot_1130",
        display: "11:30 AM",
        available: true,
    },
];

/// Slots actually offered to the user: the first three available ones,
/// matching WhatsApp's three-button limit on quick replies.
pub const OFFERED_SLOT_COUNT: usize = 3;

pub fn offered_slots() -> Vec<&'static TimeSlot> {
    TIME_SLOTS
        .iter()
        .filter(|s| s.available)
        .take(OFFERED_SLOT_COUNT)
        .collect()
}

pub fn doctor_by_id(id: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id)
}

/// Resolve a doctor choice from either a 1-based position or a raw doctor
/// id. Typed replies and structured list replies surface choices
/// differently, so both forms must be accepted.
pub fn resolve_doctor(input: &str) -> Option<&'static Doctor> {
    let input = input.trim();

    // Positional form is a single bare digit; signed or zero-padded
    // numerals ("+1", "01") are not selections.
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        if input.len() != 1 {
            return None;
        }
        let position = input.parse::<usize>().ok()?;
        if (1..=DOCTORS.len()).contains(&position) {
            return Some(&DOCTORS[position - 1]);
        }
        return None;
    }

    doctor_by_id(input)
}

/// Resolve a slot choice from either its id or its exact display string
/// (case-sensitive). Only available slots resolve.
pub fn resolve_slot(input: &str) -> Option<&'static TimeSlot> {
    let input = input.trim();

    TIME_SLOTS
        .iter()
        .filter(|s| s.available)
        .find(|s| s.id == input || s.display == input)
}
