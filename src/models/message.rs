use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Identified;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Dispatch,
    Driver,
    Customer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_type: Party,
    pub receiver_id: String,
    pub receiver_type: Party,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Message {
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

impl Identified for Message {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageDraft {
    pub sender_id: String,
    pub sender_type: Party,
    pub receiver_id: String,
    pub receiver_type: Party,
    pub content: String,
}

impl MessageDraft {
    /// Dispatch is a role, so its sender id is the role name itself.
    pub fn from_dispatch_to_driver(driver_id: &str, content: String) -> Self {
        Self {
            sender_id: "dispatch".to_string(),
            sender_type: Party::Dispatch,
            receiver_id: driver_id.to_string(),
            receiver_type: Party::Driver,
            content,
        }
    }
}
