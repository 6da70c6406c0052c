pub mod engine;
pub mod language;
pub mod store;
