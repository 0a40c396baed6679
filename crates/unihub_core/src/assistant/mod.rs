//! Contextual academic assistant.
//!
//! # Responsibility
//! - Read a fresh context snapshot per query (`context`).
//! - Answer queries with an ordered keyword rule cascade (`rules`).
//! - Run single conversations with one query in flight at a time (`session`).

pub mod context;
pub mod rules;
pub mod session;
