//! Domain model for birthday reminders.
//!
//! # Responsibility
//! - Define the canonical contact record shared by import, storage and scheduling.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - `name` is the merge key across import sources.

pub mod contact;
