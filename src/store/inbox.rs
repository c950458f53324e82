use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::models::alert::{Alert, AlertDraft};
use crate::models::message::{Message, MessageDraft};
use crate::models::notification::{Notification, NotificationDraft};
use crate::store::events::StoreEvent;
use crate::store::{Store, new_id};

impl Store {
    pub fn send_message(&mut self, draft: MessageDraft) -> Message {
        let message = Message {
            id: new_id("msg"),
            sender_id: draft.sender_id,
            sender_type: draft.sender_type,
            receiver_id: draft.receiver_id,
            receiver_type: draft.receiver_type,
            content: draft.content,
            timestamp: Utc::now(),
            read: false,
        };

        self.messages.insert(message.clone());
        self.emit(StoreEvent::Message(message.clone()));
        message
    }

    pub fn mark_message_read(&mut self, message_id: &str) -> Result<(), AppError> {
        let message = self
            .messages
            .get_mut(message_id)
            .ok_or_else(|| AppError::not_found("message", message_id))?;
        message.read = true;
        Ok(())
    }

    pub fn add_notification(&mut self, draft: NotificationDraft) -> Notification {
        let notification = Notification {
            id: new_id("notif"),
            user_id: draft.user_id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            timestamp: Utc::now(),
            read: false,
            data: draft.data,
        };

        self.notifications.insert(notification.clone());
        self.emit(StoreEvent::Notification(notification.clone()));
        notification
    }

    pub fn mark_notification_read(&mut self, notification_id: &str) -> Result<(), AppError> {
        let notification = self
            .notifications
            .get_mut(notification_id)
            .ok_or_else(|| AppError::not_found("notification", notification_id))?;
        notification.read = true;
        Ok(())
    }

    pub fn add_alert(&mut self, draft: AlertDraft) -> Alert {
        let alert = Alert {
            id: new_id("alert"),
            kind: draft.kind,
            severity: draft.severity,
            title: draft.title,
            message: draft.message,
            driver_id: draft.driver_id,
            route_id: draft.route_id,
            timestamp: Utc::now(),
            resolved: false,
        };

        info!(alert_id = %alert.id, severity = ?alert.severity, "alert raised");
        self.alerts.insert(alert.clone());
        self.emit(StoreEvent::Alert(alert.clone()));
        alert
    }

    pub fn resolve_alert(&mut self, alert_id: &str) -> Result<(), AppError> {
        let alert = self
            .alerts
            .get_mut(alert_id)
            .ok_or_else(|| AppError::not_found("alert", alert_id))?;
        alert.resolved = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::models::alert::{AlertDraft, AlertType, Severity};
    use crate::models::message::{MessageDraft, Party};
    use crate::models::notification::{NotificationDraft, NotificationType};
    use crate::store::Store;
    use crate::store::events::StoreEvent;

    #[test]
    fn marking_unknown_notification_leaves_collection_untouched() {
        let mut store = Store::seeded();
        let before = serde_json::to_string(store.notifications()).unwrap();

        let result = store.mark_notification_read("notif-404");

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(serde_json::to_string(store.notifications()).unwrap(), before);
    }

    #[test]
    fn sent_message_starts_unread_and_can_be_marked_read() {
        let mut store = Store::seeded();

        let message = store.send_message(MessageDraft {
            sender_id: "driver-1".to_string(),
            sender_type: Party::Driver,
            receiver_id: "dispatch".to_string(),
            receiver_type: Party::Dispatch,
            content: "Running 10 minutes behind".to_string(),
        });
        assert!(!message.read);
        assert!(message.id.starts_with("msg-"));

        store.mark_message_read(&message.id).unwrap();
        assert!(store.messages().get(&message.id).unwrap().read);
    }

    #[test]
    fn notification_is_queued_for_broadcast() {
        let mut store = Store::seeded();
        store.drain_events();

        let notification = store.add_notification(NotificationDraft {
            user_id: "customer-3".to_string(),
            kind: NotificationType::Delayed,
            title: "Pickup Delayed".to_string(),
            message: "Your pickup is running late".to_string(),
            data: None,
        });

        assert_eq!(
            store.drain_events(),
            vec![StoreEvent::Notification(notification)]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn alerts_open_unresolved_and_resolve_by_id() {
        let mut store = Store::seeded();

        let alert = store.add_alert(AlertDraft {
            kind: AlertType::Incident,
            severity: Severity::High,
            title: "Vehicle breakdown".to_string(),
            message: "Truck T-104 stalled on Pine St".to_string(),
            driver_id: Some("driver-3".to_string()),
            route_id: Some("route-3".to_string()),
        });
        assert!(!alert.resolved);

        store.resolve_alert(&alert.id).unwrap();
        assert!(store.alerts().get(&alert.id).unwrap().resolved);

        assert!(matches!(
            store.resolve_alert("alert-404"),
            Err(AppError::NotFound(_))
        ));
    }
}
