//! Notification feed with synchronous subscriber fan-out.
//!
//! # Responsibility
//! - Own the `notifications` collection and every mutation of it.
//! - Persist the full list after each mutation and notify subscribers.
//!
//! # Invariants
//! - The list is newest-first; `add` prepends.
//! - `unread_count` is derived from the list on every access.
//! - The store is written before the in-memory list is replaced, so a failed
//!   write leaves the bus unchanged and notifies nobody.
//! - Subscribers run in registration order, once per mutation, with the
//!   post-mutation state.

use crate::model::notification::{Notification, NotificationKind, NotificationValidationError};
use crate::store::record_store::RecordStore;
use crate::store::{StoreError, NOTIFICATIONS_KEY};
use chrono::Utc;
use log::{error, info};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};
use uuid::Uuid;

pub type NotificationResult<T> = Result<T, NotificationError>;

/// Notification bus failure.
#[derive(Debug)]
pub enum NotificationError {
    /// Rejected `add` input.
    Validation(NotificationValidationError),
    /// Persisting the updated list failed; in-memory state is unchanged.
    Storage(StoreError),
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "failed to persist notifications: {err}"),
        }
    }
}

impl Error for NotificationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<NotificationValidationError> for NotificationError {
    fn from(value: NotificationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for NotificationError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Post-mutation state delivered to subscribers.
#[derive(Debug, Clone, Copy)]
pub struct NotificationUpdate<'a> {
    pub notifications: &'a [Notification],
    pub unread_count: usize,
}

type Callback = Rc<RefCell<dyn FnMut(&NotificationUpdate<'_>)>>;

#[derive(Default)]
struct SubscriberRegistry {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call `unsubscribe`.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<SubscriberRegistry>>,
}

impl Subscription {
    /// Removes the subscriber. No-op when the bus is already gone.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.entries.len())
            .finish()
    }
}

/// Persisted notification feed.
pub struct NotificationBus {
    store: RecordStore,
    notifications: Vec<Notification>,
    subscribers: Rc<RefCell<SubscriberRegistry>>,
}

impl NotificationBus {
    /// Loads the persisted feed. Corrupt or missing storage yields an empty feed.
    pub fn open(store: RecordStore) -> Self {
        let notifications = store.get::<Notification>(NOTIFICATIONS_KEY);
        info!(
            "event=notifications_open module=notifications status=ok count={}",
            notifications.len()
        );
        Self {
            store,
            notifications,
            subscribers: Rc::new(RefCell::new(SubscriberRegistry::default())),
        }
    }

    /// Current feed, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|item| item.is_unread())
            .count()
    }

    /// Registers an observer called after every mutation.
    pub fn subscribe(
        &self,
        callback: impl FnMut(&NotificationUpdate<'_>) + 'static,
    ) -> Subscription {
        let mut registry = self.subscribers.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        registry.entries.push((id, callback));
        Subscription {
            id,
            registry: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// Publishes a new unread notification at the head of the feed.
    ///
    /// # Errors
    /// - `Validation` when `title` or `message` is blank.
    /// - `Storage` when the updated feed cannot be written.
    pub fn add(
        &mut self,
        title: &str,
        message: &str,
        kind: NotificationKind,
        action_url: Option<String>,
    ) -> NotificationResult<Notification> {
        if let Err(err) = Notification::validate_input(title, message) {
            info!(
                "event=notification_add module=notifications status=rejected kind={} reason={err}",
                kind.as_str()
            );
            return Err(err.into());
        }

        let mut notification = Notification::new(title, message, kind, action_url, Utc::now());
        while self.get(&notification.id).is_some() {
            notification.id = Uuid::new_v4().to_string();
        }

        let mut next = Vec::with_capacity(self.notifications.len() + 1);
        next.push(notification.clone());
        next.extend(self.notifications.iter().cloned());
        self.commit(next, "notification_add")?;

        info!(
            "event=notification_add module=notifications status=ok kind={} id={}",
            kind.as_str(),
            notification.id
        );
        Ok(notification)
    }

    /// Marks one notification read. Unknown ids are not an error.
    pub fn mark_as_read(&mut self, id: &str) -> NotificationResult<()> {
        let mut next = self.notifications.clone();
        let found = match next.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        };
        self.commit(next, "notification_read")?;
        info!("event=notification_read module=notifications status=ok id={id} found={found}");
        Ok(())
    }

    pub fn mark_all_as_read(&mut self) -> NotificationResult<()> {
        let next = self
            .notifications
            .iter()
            .cloned()
            .map(|mut item| {
                item.read = true;
                item
            })
            .collect();
        self.commit(next, "notification_read_all")
    }

    /// Deletes one notification. Unknown ids are not an error.
    pub fn remove(&mut self, id: &str) -> NotificationResult<()> {
        let next: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        let found = next.len() != self.notifications.len();
        self.commit(next, "notification_remove")?;
        info!("event=notification_remove module=notifications status=ok id={id} found={found}");
        Ok(())
    }

    pub fn clear_all(&mut self) -> NotificationResult<()> {
        self.commit(Vec::new(), "notification_clear")
    }

    /// Re-reads the persisted feed, picking up writes from other processes.
    pub fn reload(&mut self) {
        self.notifications = self.store.get::<Notification>(NOTIFICATIONS_KEY);
        self.notify();
    }

    fn commit(&mut self, next: Vec<Notification>, event: &str) -> NotificationResult<()> {
        if let Err(err) = self.store.set(NOTIFICATIONS_KEY, &next) {
            error!("event={event} module=notifications status=error error_code=persist_failed error={err}");
            return Err(err.into());
        }
        self.notifications = next;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        // Captured up front so callbacks may unsubscribe during dispatch.
        let callbacks: Vec<Callback> = self
            .subscribers
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        let update = NotificationUpdate {
            notifications: &self.notifications,
            unread_count: self.unread_count(),
        };
        for callback in &callbacks {
            let mut handler = callback.borrow_mut();
            (&mut *handler)(&update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationBus, NotificationError};
    use crate::model::notification::{NotificationKind, NotificationValidationError};
    use crate::store::kv::MemoryKeyValueStore;
    use crate::store::record_store::RecordStore;

    fn bus() -> NotificationBus {
        NotificationBus::open(RecordStore::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn add_prepends_unread_entry() {
        let mut bus = bus();
        let first = bus.add("First", "one", NotificationKind::System, None).unwrap();
        let second = bus.add("Second", "two", NotificationKind::Exam, None).unwrap();

        let ids: Vec<&str> = bus.notifications().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert_eq!(bus.unread_count(), 2);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn add_rejects_empty_title_without_side_effects() {
        let mut bus = bus();
        let err = bus.add("", "body", NotificationKind::Notice, None).unwrap_err();
        assert!(matches!(
            err,
            NotificationError::Validation(NotificationValidationError::EmptyTitle)
        ));
        assert!(bus.is_empty());
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut bus = bus();
        bus.add("Title", "Body", NotificationKind::Event, None).unwrap();
        bus.mark_as_read("missing").unwrap();
        bus.remove("missing").unwrap();
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.unread_count(), 1);
    }
}
