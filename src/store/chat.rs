use chrono::Utc;

use crate::error::AppError;
use crate::models::chat::{ChatMessage, ChatRole, ChatThread};
use crate::store::events::StoreEvent;
use crate::store::{Store, new_id};

impl Store {
    pub fn create_chat_thread(&mut self, customer_id: &str, title: &str) -> ChatThread {
        let now = Utc::now();
        let thread = ChatThread {
            id: new_id("chat"),
            customer_id: customer_id.to_string(),
            title: title.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.chat_threads.insert(thread.clone());
        thread
    }

    pub fn add_chat_message(
        &mut self,
        thread_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, AppError> {
        let thread = self
            .chat_threads
            .get_mut(thread_id)
            .ok_or_else(|| AppError::not_found("chat thread", thread_id))?;

        let message = ChatMessage {
            id: new_id("chat-msg"),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        thread.messages.push(message.clone());
        thread.updated_at = message.timestamp;

        let customer_id = thread.customer_id.clone();
        self.emit(StoreEvent::ChatMessage {
            thread_id: thread_id.to_string(),
            customer_id,
            message: message.clone(),
        });
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::models::chat::ChatRole;
    use crate::store::Store;

    #[test]
    fn new_thread_starts_empty_and_grows_in_order() {
        let mut store = Store::seeded();

        let thread = store.create_chat_thread("customer-6", "Support Chat");
        assert!(thread.messages.is_empty());

        store
            .add_chat_message(&thread.id, ChatRole::User, "hello")
            .unwrap();
        let reply = store
            .add_chat_message(&thread.id, ChatRole::Assistant, "Hi there")
            .unwrap();

        let stored = store.chat_threads().get(&thread.id).unwrap();
        let roles: Vec<ChatRole> = stored.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert_eq!(stored.updated_at, reply.timestamp);
        assert!(stored.updated_at >= stored.created_at);
    }

    #[test]
    fn message_to_unknown_thread_is_not_found() {
        let mut store = Store::seeded();
        assert!(matches!(
            store.add_chat_message("chat-404", ChatRole::User, "anyone?"),
            Err(AppError::NotFound(_))
        ));
    }
}
