//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record-store reads/writes into use-case level APIs.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod announcements;
pub mod dashboard;
pub mod notification_bus;
