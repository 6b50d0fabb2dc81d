//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate importers, repository and scheduler into use-case APIs.
//! - Keep FFI callers decoupled from storage details.

pub mod contact_service;
pub mod reconcile_service;
pub mod reminder_service;
