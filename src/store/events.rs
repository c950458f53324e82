use serde::Serialize;

use crate::models::alert::Alert;
use crate::models::chat::ChatMessage;
use crate::models::driver::Driver;
use crate::models::message::Message;
use crate::models::notification::Notification;
use crate::models::route::Stop;

/// Something a connected front-end should hear about after a mutation commits.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum StoreEvent {
    Notification(Notification),
    Message(Message),
    Alert(Alert),
    ChatMessage {
        thread_id: String,
        customer_id: String,
        message: ChatMessage,
    },
    DriverUpdated(Driver),
    StopUpdated(Stop),
    StopRemoved(Stop),
    Reset,
}

impl StoreEvent {
    /// Whether a subscriber acting as `user_id` should receive this event.
    pub fn is_for(&self, user_id: &str) -> bool {
        match self {
            StoreEvent::Notification(notification) => notification.user_id == user_id,
            StoreEvent::Message(message) => message.involves(user_id),
            StoreEvent::Alert(alert) => alert.driver_id.as_deref() == Some(user_id),
            StoreEvent::ChatMessage { customer_id, .. } => customer_id == user_id,
            StoreEvent::DriverUpdated(driver) => driver.id == user_id,
            StoreEvent::StopUpdated(stop) | StoreEvent::StopRemoved(stop) => {
                stop.customer_id == user_id
            }
            StoreEvent::Reset => true,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::Notification(_) => "notification",
            StoreEvent::Message(_) => "message",
            StoreEvent::Alert(_) => "alert",
            StoreEvent::ChatMessage { .. } => "chat_message",
            StoreEvent::DriverUpdated(_) => "driver_updated",
            StoreEvent::StopUpdated(_) => "stop_updated",
            StoreEvent::StopRemoved(_) => "stop_removed",
            StoreEvent::Reset => "reset",
        }
    }
}
