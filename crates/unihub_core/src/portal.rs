//! Process-level service object.
//!
//! # Responsibility
//! - Construct the record store, notification bus and current user once.
//! - Hand out assistant sessions and summaries wired to the same store.
//!
//! # Invariants
//! - One `Portal` owns the only `NotificationBus` for its store; components
//!   receive it by reference instead of looking it up globally.

use crate::assistant::context::ContextAggregator;
use crate::assistant::rules::RuleCascade;
use crate::assistant::session::AssistantSession;
use crate::config::{AssistantConfig, PortalConfig};
use crate::db::DbError;
use crate::model::user::CurrentUser;
use crate::service::dashboard::{dashboard_summary, DashboardSummary};
use crate::service::notification_bus::NotificationBus;
use crate::store::kv::SqliteKeyValueStore;
use crate::store::record_store::RecordStore;
use chrono::NaiveDate;
use log::info;

pub struct Portal {
    store: RecordStore,
    notifications: NotificationBus,
    user: CurrentUser,
    assistant: AssistantConfig,
}

impl Portal {
    pub fn new(store: RecordStore, user: CurrentUser) -> Self {
        let notifications = NotificationBus::open(store.clone());
        Self {
            store,
            notifications,
            user,
            assistant: AssistantConfig::default(),
        }
    }

    /// Opens the SQLite store named by `config.storage.db_path`.
    pub fn open(config: &PortalConfig, user: CurrentUser) -> Result<Self, DbError> {
        let backend = SqliteKeyValueStore::open(&config.storage.db_path)?;
        info!(
            "event=portal_open module=portal status=ok db_path={}",
            config.storage.db_path
        );
        let portal = Self::new(RecordStore::new(backend), user)
            .with_assistant_config(config.assistant.clone());
        Ok(portal)
    }

    pub fn with_assistant_config(mut self, assistant: AssistantConfig) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn notifications(&self) -> &NotificationBus {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationBus {
        &mut self.notifications
    }

    pub fn context(&self) -> ContextAggregator {
        ContextAggregator::new(self.store.clone())
    }

    /// New conversation for the current user, answered by the rule cascade.
    pub fn start_assistant(&self) -> AssistantSession {
        AssistantSession::new(self.user.clone(), self.context(), Box::new(RuleCascade))
            .with_resolution_timeout(self.assistant.resolution_timeout())
    }

    pub fn summary(&self, today: NaiveDate) -> DashboardSummary {
        dashboard_summary(&self.store, &self.notifications, today)
    }
}
