//! Domain records for clients, appointments and notifications.
//!
//! # Responsibility
//! - Define read models returned by the store and input/patch types for writes.
//! - Isolate template list encoding from the rest of the model.
//!
//! # Invariants
//! - Every record is identified by a surrogate integer id.
//! - References between records are by id only; nothing cascades.

pub mod appointment;
pub mod client;
pub mod notification;
pub mod templates;
