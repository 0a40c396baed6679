//! Standard notifications published when portal records are created.
//!
//! # Responsibility
//! - Keep the wording and routing of producer notifications in one place.
//!
//! # Invariants
//! - Every announcement goes through `NotificationBus::add`, so validation
//!   and subscriber fan-out apply unchanged.

use crate::model::notification::{Notification, NotificationKind};
use crate::service::notification_bus::{NotificationBus, NotificationResult};
use chrono::NaiveDate;

/// Announces a freshly posted notice; activating it opens the notice.
pub fn announce_notice(
    bus: &mut NotificationBus,
    notice_id: &str,
    notice_title: &str,
) -> NotificationResult<Notification> {
    bus.add(
        "New Notice Posted",
        notice_title,
        NotificationKind::Notice,
        Some(format!("/notices?id={notice_id}")),
    )
}

/// Announces a newly scheduled exam.
pub fn announce_exam(
    bus: &mut NotificationBus,
    subject: &str,
    date: &str,
) -> NotificationResult<Notification> {
    let message = format!("{subject} exam scheduled for {}", long_date(date));
    bus.add("New Exam Scheduled", &message, NotificationKind::Exam, None)
}

/// `2024-03-01` -> `March 1, 2024`; anything unparseable is kept verbatim.
fn long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(day) => day.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{announce_exam, announce_notice, long_date};
    use crate::model::notification::NotificationKind;
    use crate::service::notification_bus::NotificationBus;
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::record_store::RecordStore;

    #[test]
    fn notice_announcement_links_to_notice() {
        let mut bus = NotificationBus::open(RecordStore::new(MemoryKeyValueStore::new()));
        let created = announce_notice(&mut bus, "42", "Library closed Friday").unwrap();

        assert_eq!(created.title, "New Notice Posted");
        assert_eq!(created.message, "Library closed Friday");
        assert_eq!(created.kind, NotificationKind::Notice);
        assert_eq!(created.action_url.as_deref(), Some("/notices?id=42"));
    }

    #[test]
    fn exam_announcement_formats_date() {
        let mut bus = NotificationBus::open(RecordStore::new(MemoryKeyValueStore::new()));
        let created = announce_exam(&mut bus, "Algebra", "2024-03-01").unwrap();

        assert_eq!(created.message, "Algebra exam scheduled for March 1, 2024");
        assert_eq!(created.kind, NotificationKind::Exam);
        assert!(created.action_url.is_none());
    }

    #[test]
    fn long_date_keeps_unparseable_text() {
        assert_eq!(long_date("TBA"), "TBA");
    }
}
