//! Host platform capability contracts.
//!
//! # Responsibility
//! - Describe the contacts, calendar and notification capabilities the host
//!   platform provides to the core.
//! - Keep platform SDK details out of import and scheduling logic.
//!
//! # Invariants
//! - Capability calls are made sequentially from one logical flow.
//! - A denied capability only disables the branch that depends on it.

pub mod calendar;
pub mod capability;
pub mod contacts;
pub mod notification;
