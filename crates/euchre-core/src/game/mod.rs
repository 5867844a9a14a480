pub mod serialization;

pub use serialization::{TrickRecord, trick_records};
