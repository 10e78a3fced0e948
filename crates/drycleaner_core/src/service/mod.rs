//! Desk use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into form-level use cases.
//! - Keep the presentation layer decoupled from storage details.

pub mod desk;
