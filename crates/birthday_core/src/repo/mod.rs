//! Repository layer for the contact record store.
//!
//! # Responsibility
//! - Define the use-case oriented contact store contract.
//! - Isolate SQLite query details from reconciliation and scheduling.
//!
//! # Invariants
//! - At most one contact per distinct name.
//! - Mutations are persisted immediately; there is no batching.

pub mod contact_repo;
