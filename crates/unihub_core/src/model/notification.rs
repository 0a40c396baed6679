//! Notification domain model.
//!
//! # Responsibility
//! - Define the persisted notification record and its category.
//! - Validate producer input before a notification is created.
//!
//! # Invariants
//! - `id` is unique within the `notifications` collection.
//! - `read` starts as `false` and only moves to `true`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one notification.
///
/// Kept as a string so collections written by older portal builds
/// (timestamp-style ids) still load.
pub type NotificationId = String;

/// Category shown next to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    System,
    Exam,
    Event,
    Notice,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Exam => "exam",
            Self::Event => "event",
            Self::Notice => "notice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Self::System),
            "exam" => Some(Self::Exam),
            "event" => Some(Self::Event),
            "notice" => Some(Self::Notice),
            _ => None,
        }
    }
}

/// One entry of the notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    /// Serialized as `type` to match the persisted collection.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    /// In-portal route opened when the notification is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Creates an unread notification with a generated id.
    ///
    /// Callers are expected to run `validate_input` first.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        action_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            created_at,
            read: false,
            action_url,
        }
    }

    /// Checks producer-supplied text fields.
    pub fn validate_input(title: &str, message: &str) -> Result<(), NotificationValidationError> {
        if title.trim().is_empty() {
            return Err(NotificationValidationError::EmptyTitle);
        }
        if message.trim().is_empty() {
            return Err(NotificationValidationError::EmptyMessage);
        }
        Ok(())
    }

    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Relative age label used by the notification list.
    ///
    /// - under one hour: `Just now`
    /// - under one day: `N hours ago`
    /// - otherwise: the `YYYY-MM-DD` creation date
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let age = now.signed_duration_since(self.created_at);
        if age.num_hours() < 1 {
            "Just now".to_string()
        } else if age.num_hours() < 24 {
            format!("{} hours ago", age.num_hours())
        } else {
            self.created_at.format("%Y-%m-%d").to_string()
        }
    }
}

/// Rejected notification input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationValidationError {
    EmptyTitle,
    EmptyMessage,
}

impl Display for NotificationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "notification title must not be empty"),
            Self::EmptyMessage => write!(f, "notification message must not be empty"),
        }
    }
}

impl Error for NotificationValidationError {}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationKind, NotificationValidationError};
    use chrono::{Duration, TimeZone, Utc};

    fn sample(created_at: chrono::DateTime<Utc>) -> Notification {
        Notification::new("Title", "Body", NotificationKind::System, None, created_at)
    }

    #[test]
    fn validate_input_rejects_blank_fields() {
        assert_eq!(
            Notification::validate_input("  ", "body"),
            Err(NotificationValidationError::EmptyTitle)
        );
        assert_eq!(
            Notification::validate_input("title", ""),
            Err(NotificationValidationError::EmptyMessage)
        );
        assert!(Notification::validate_input("title", "body").is_ok());
    }

    #[test]
    fn serializes_with_portal_field_names() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut notification = sample(created);
        notification.action_url = Some("/notices?id=7".to_string());

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["read"], false);
        assert_eq!(json["actionUrl"], "/notices?id=7");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-03-01T09:30:00"));
    }

    #[test]
    fn loads_portal_timestamp_format() {
        let raw = r#"{"id":"1709283000000","title":"T","message":"M","type":"exam",
            "createdAt":"2024-03-01T09:30:00.000Z","read":true}"#;
        let notification: Notification = serde_json::from_str(raw).unwrap();
        assert_eq!(notification.kind, NotificationKind::Exam);
        assert!(notification.read);
        assert!(notification.action_url.is_none());
    }

    #[test]
    fn age_label_buckets() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let notification = sample(created);

        assert_eq!(notification.age_label(created + Duration::minutes(20)), "Just now");
        assert_eq!(notification.age_label(created + Duration::hours(5)), "5 hours ago");
        assert_eq!(notification.age_label(created + Duration::days(3)), "2024-03-01");
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(NotificationKind::parse("Notice"), Some(NotificationKind::Notice));
        assert_eq!(NotificationKind::parse("unknown"), None);
    }
}
