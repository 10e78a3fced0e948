//! Domain model for customers, orders and payments.
//!
//! # Responsibility
//! - Define the three record types and their wire field names.
//! - Keep each record type in its own top-level collection.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId`.
//! - No record embeds another; associations are plain ids.

pub mod customer;
pub mod entity;
pub mod order;
pub mod payment;
