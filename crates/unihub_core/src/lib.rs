//! Core logic for the UniHub portal: the notification feed and the
//! contextual academic assistant.
//! This crate is the single source of truth for their invariants.

pub mod assistant;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod portal;
pub mod service;
pub mod store;

pub use assistant::context::{ContextAggregator, ContextSnapshot, SNAPSHOT_LIMIT};
pub use assistant::rules::{resolve, ResolveError, Resolver, Rule, RuleCascade, RULES};
pub use assistant::session::{AssistantSession, PendingTurn, SessionState, SubmitOutcome};
pub use config::{ConfigError, PortalConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::conversation::{ConversationTurn, Sender};
pub use model::notification::{Notification, NotificationKind, NotificationValidationError};
pub use model::records::{EventRecord, ExamRecord, NoticeRecord};
pub use model::user::CurrentUser;
pub use portal::Portal;
pub use service::dashboard::DashboardSummary;
pub use service::notification_bus::{
    NotificationBus, NotificationError, NotificationResult, NotificationUpdate, Subscription,
};
pub use store::kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use store::record_store::RecordStore;
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
