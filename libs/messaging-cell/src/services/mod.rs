pub mod verification;
pub mod whatsapp;
