//! Domain model for the notification feed and the assistant.
//!
//! # Responsibility
//! - Define canonical data structures shared by services and the assistant.
//! - Mirror the field names of the persisted portal collections.
//!
//! # Invariants
//! - Every notification is identified by a stable id.
//! - Conversation turns are immutable once created.

pub mod conversation;
pub mod notification;
pub mod records;
pub mod user;
