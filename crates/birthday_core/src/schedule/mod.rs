//! Reminder scheduling: when a birthday fires and how it is registered.
//!
//! # Responsibility
//! - Compute the next fire date/time of a yearly birthday.
//! - Turn stored contacts into notification registrations.
//! - Hand delivered reminder payloads to the UI layer.
//!
//! # Invariants
//! - `next_occurrence` is the single source of truth for fire dates.
//! - Contacts without birthday never produce a registration.

pub mod next_occurrence;
pub mod response;
pub mod scheduler;
