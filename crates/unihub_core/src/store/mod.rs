//! Persistence layer for named record collections.
//!
//! # Responsibility
//! - Abstract the key-value substrate (memory map or SQLite file).
//! - Expose typed collection reads/writes that absorb corrupted content.
//!
//! # Invariants
//! - Corruption never escapes this layer on reads.
//! - Write failures are reported to the caller as `StoreError`.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod record_store;

/// Collection of portal notices.
pub const NOTICES_KEY: &str = "notices";
/// Collection of calendar events.
pub const EVENTS_KEY: &str = "events";
/// Collection of exam schedules.
pub const EXAM_SCHEDULES_KEY: &str = "examSchedules";
/// Collection owned by the notification bus.
pub const NOTIFICATIONS_KEY: &str = "notifications";

pub type StoreResult<T> = Result<T, StoreError>;

/// Substrate read/write failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
