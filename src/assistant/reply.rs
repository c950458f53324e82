use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};

use crate::assistant::respond;
use crate::config::ChatTiming;
use crate::error::AppError;
use crate::models::chat::{ChatMessage, ChatRole};
use crate::state::AppState;

pub const SUPPORT_THREAD_TITLE: &str = "Support Chat";

#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub thread_id: String,
    pub message: ChatMessage,
}

/// Appends a customer's message to their support thread (opening one if
/// needed) and schedules the assistant's answer after a simulated typing
/// pause. The answer arrives later as a chat event.
pub async fn post_customer_message(
    state: &Arc<AppState>,
    customer_id: &str,
    content: &str,
) -> Result<ChatExchange, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let exchange = state
        .mutate("post_chat_message", |store| {
            if !store.customers().contains(customer_id) {
                return Err(AppError::not_found("customer", customer_id));
            }

            let thread_id = match store.chat_thread_for_customer(customer_id) {
                Some(thread) => thread.id.clone(),
                None => store
                    .create_chat_thread(customer_id, SUPPORT_THREAD_TITLE)
                    .id,
            };
            let message = store.add_chat_message(&thread_id, ChatRole::User, content)?;

            Ok(ChatExchange { thread_id, message })
        })
        .await?;

    tokio::spawn(deliver_reply(
        state.clone(),
        exchange.thread_id.clone(),
        content.to_string(),
    ));

    Ok(exchange)
}

async fn deliver_reply(state: Arc<AppState>, thread_id: String, prompt: String) {
    sleep(typing_delay(state.chat_timing)).await;

    let reply = respond(&prompt);
    let added = state
        .mutate("add_chat_message", |store| {
            store.add_chat_message(&thread_id, ChatRole::Assistant, &reply)
        })
        .await;
    match added {
        Ok(message) => {
            state.metrics.chat_replies_total.inc();
            info!(thread_id = %thread_id, message_id = %message.id, "assistant replied");
        }
        Err(err) => {
            warn!(thread_id = %thread_id, error = %err, "assistant reply dropped");
        }
    }
}

fn typing_delay(timing: ChatTiming) -> Duration {
    let jitter = if timing.typing_jitter_ms == 0 {
        0
    } else {
        rand::rng().random_range(0..=timing.typing_jitter_ms)
    };
    Duration::from_millis(timing.typing_delay_ms + jitter)
}
