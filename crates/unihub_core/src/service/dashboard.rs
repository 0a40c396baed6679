//! Overview counts shown on the portal dashboard.
//!
//! Unlike the assistant snapshot these counts are not truncated: every
//! upcoming event and exam is counted.

use crate::model::records::{Dated, EventRecord, ExamRecord, NoticeRecord};
use crate::service::notification_bus::NotificationBus;
use crate::store::record_store::RecordStore;
use crate::store::{EVENTS_KEY, EXAM_SCHEDULES_KEY, NOTICES_KEY};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub unread_notifications: usize,
    pub total_notices: usize,
    pub upcoming_events: usize,
    pub upcoming_exams: usize,
}

/// Counts collections as of `today`.
pub fn dashboard_summary(
    store: &RecordStore,
    bus: &NotificationBus,
    today: NaiveDate,
) -> DashboardSummary {
    DashboardSummary {
        unread_notifications: bus.unread_count(),
        total_notices: store.get::<NoticeRecord>(NOTICES_KEY).len(),
        upcoming_events: count_upcoming(&store.get::<EventRecord>(EVENTS_KEY), today),
        upcoming_exams: count_upcoming(&store.get::<ExamRecord>(EXAM_SCHEDULES_KEY), today),
    }
}

fn count_upcoming(records: &[impl Dated], today: NaiveDate) -> usize {
    records
        .iter()
        .filter(|record| record.is_upcoming(today))
        .count()
}

#[cfg(test)]
mod tests {
    use super::dashboard_summary;
    use crate::model::notification::NotificationKind;
    use crate::service::notification_bus::NotificationBus;
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};
    use crate::store::record_store::RecordStore;
    use chrono::NaiveDate;

    #[test]
    fn counts_every_upcoming_record() {
        let backend = MemoryKeyValueStore::new();
        backend
            .set_raw("notices", r#"[{"title":"A"},{"title":"B"}]"#)
            .unwrap();
        let events: Vec<String> = (1..=7)
            .map(|day| format!(r#"{{"title":"E{day}","date":"2024-05-0{day}"}}"#))
            .collect();
        backend
            .set_raw("events", &format!("[{}]", events.join(",")))
            .unwrap();
        backend
            .set_raw(
                "examSchedules",
                r#"[{"subject":"Old","date":"2024-04-30"},{"subject":"Bad","date":"soon"}]"#,
            )
            .unwrap();
        let store = RecordStore::new(backend);
        let mut bus = NotificationBus::open(store.clone());
        bus.add("Hi", "there", NotificationKind::System, None)
            .unwrap();

        let summary =
            dashboard_summary(&store, &bus, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        assert_eq!(summary.unread_notifications, 1);
        assert_eq!(summary.total_notices, 2);
        assert_eq!(summary.upcoming_events, 7);
        assert_eq!(summary.upcoming_exams, 0);
    }
}
