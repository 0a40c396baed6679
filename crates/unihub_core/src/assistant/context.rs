//! Point-in-time context read for the assistant.
//!
//! # Responsibility
//! - Read notices, events and exams from the record store on every request.
//! - Trim each collection to what the assistant answers with.
//!
//! # Invariants
//! - Snapshots are never cached; each call re-reads the store.
//! - Notices: first `SNAPSHOT_LIMIT` entries in stored order.
//! - Events/exams: entries dated on or after the current date, first
//!   `SNAPSHOT_LIMIT` survivors in stored order. No date sort is applied, so
//!   a closer date stored later can be cut off.

use crate::model::records::{Dated, EventRecord, ExamRecord, NoticeRecord};
use crate::model::user::CurrentUser;
use crate::store::record_store::RecordStore;
use crate::store::{EVENTS_KEY, EXAM_SCHEDULES_KEY, NOTICES_KEY};
use chrono::{NaiveDate, Utc};
use log::debug;
use serde::Serialize;

/// Maximum entries per collection in one snapshot.
pub const SNAPSHOT_LIMIT: usize = 5;

/// What the assistant knows at the moment of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub notices: Vec<NoticeRecord>,
    pub upcoming_events: Vec<EventRecord>,
    pub upcoming_exams: Vec<ExamRecord>,
    pub current_date: NaiveDate,
    pub user_role: String,
    pub user_name: String,
}

/// Builds `ContextSnapshot`s from the shared record store.
#[derive(Clone)]
pub struct ContextAggregator {
    store: RecordStore,
    pinned_date: Option<NaiveDate>,
}

impl ContextAggregator {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            pinned_date: None,
        }
    }

    /// Uses `date` as the current date for every snapshot instead of the clock.
    pub fn pinned_to(mut self, date: NaiveDate) -> Self {
        self.pinned_date = Some(date);
        self
    }

    /// Current UTC date unless pinned.
    pub fn current_date(&self) -> NaiveDate {
        self.pinned_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn snapshot(&self, user: &CurrentUser) -> ContextSnapshot {
        self.snapshot_at(user, self.current_date())
    }

    pub fn snapshot_at(&self, user: &CurrentUser, today: NaiveDate) -> ContextSnapshot {
        let notices: Vec<NoticeRecord> = self
            .store
            .get::<NoticeRecord>(NOTICES_KEY)
            .into_iter()
            .take(SNAPSHOT_LIMIT)
            .collect();
        let upcoming_events = first_upcoming(self.store.get::<EventRecord>(EVENTS_KEY), today);
        let upcoming_exams =
            first_upcoming(self.store.get::<ExamRecord>(EXAM_SCHEDULES_KEY), today);

        debug!(
            "event=context_snapshot module=assistant status=ok notices={} events={} exams={} date={today}",
            notices.len(),
            upcoming_events.len(),
            upcoming_exams.len()
        );

        ContextSnapshot {
            notices,
            upcoming_events,
            upcoming_exams,
            current_date: today,
            user_role: user.role.clone(),
            user_name: user.name.clone(),
        }
    }
}

fn first_upcoming<T: Dated>(records: Vec<T>, today: NaiveDate) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| record.is_upcoming(today))
        .take(SNAPSHOT_LIMIT)
        .collect()
}
