//! Read-only views of portal collections consumed by the assistant.
//!
//! The portal pages own these collections and store more fields than the
//! core reads; unknown fields are ignored on decode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Notice board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredNotice")]
pub struct NoticeRecord {
    pub title: String,
    /// ISO-8601 post timestamp, kept verbatim.
    pub created_at: String,
}

/// Notice as written by the portal. Older builds wrote only `postDate`;
/// newer ones may carry both fields, and `createdAt` wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredNotice {
    title: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    post_date: Option<String>,
}

impl From<StoredNotice> for NoticeRecord {
    fn from(value: StoredNotice) -> Self {
        Self {
            title: value.title,
            created_at: value
                .created_at
                .or(value.post_date)
                .unwrap_or_default(),
        }
    }
}

/// Calendar event entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Exam schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub subject: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub time: String,
}

/// Records that carry a calendar day.
pub trait Dated {
    fn date_text(&self) -> &str;

    /// Parsed day, or `None` when the stored text is not `YYYY-MM-DD`.
    fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_text().trim(), DATE_FORMAT).ok()
    }

    /// Whether the record falls on or after `today`. Unparseable dates never do.
    fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.day().is_some_and(|day| day >= today)
    }
}

impl Dated for EventRecord {
    fn date_text(&self) -> &str {
        &self.date
    }
}

impl Dated for ExamRecord {
    fn date_text(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::{Dated, ExamRecord, NoticeRecord};
    use chrono::NaiveDate;

    fn exam(date: &str) -> ExamRecord {
        ExamRecord {
            subject: "Physics".to_string(),
            date: date.to_string(),
            time: "09:00".to_string(),
        }
    }

    #[test]
    fn upcoming_includes_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(exam("2024-03-10").is_upcoming(today));
        assert!(exam("2024-04-01").is_upcoming(today));
        assert!(!exam("2024-03-09").is_upcoming(today));
    }

    #[test]
    fn unparseable_date_is_not_upcoming() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(!exam("next week").is_upcoming(today));
    }

    #[test]
    fn notice_accepts_legacy_post_date_field() {
        let notice: NoticeRecord = serde_json::from_str(
            r#"{"id":"1","title":"Library hours","postDate":"2024-02-01T08:00:00.000Z","type":"general"}"#,
        )
        .unwrap();
        assert_eq!(notice.created_at, "2024-02-01T08:00:00.000Z");
    }

    #[test]
    fn notice_with_both_timestamps_prefers_created_at() {
        let notice: NoticeRecord = serde_json::from_str(
            r#"{"title":"Midterm Reschedule","createdAt":"2024-03-01T00:00:00Z","postDate":"2024-02-28T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(notice.title, "Midterm Reschedule");
        assert_eq!(notice.created_at, "2024-03-01T00:00:00Z");
    }

    #[test]
    fn notice_without_timestamp_decodes_with_empty_text() {
        let notice: NoticeRecord = serde_json::from_str(r#"{"title":"Untimed"}"#).unwrap();
        assert_eq!(notice.created_at, "");
    }
}
