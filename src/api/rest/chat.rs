use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use serde::Deserialize;

use crate::assistant::reply::{ChatExchange, post_customer_message};
use crate::error::AppError;
use crate::models::chat::{ChatMessage, ChatRole, ChatThread};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(post_chat))
        .route("/chat/threads", get(list_threads).post(create_thread))
        .route("/chat/threads/:id/messages", post(add_chat_message))
}

#[derive(Deserialize)]
pub struct ThreadFilter {
    pub customer_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateThreadRequest {
    pub customer_id: String,
    pub title: String,
}

#[derive(Deserialize)]
pub struct AddChatMessageRequest {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Deserialize)]
pub struct PostChatRequest {
    pub customer_id: String,
    pub content: String,
}

async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ThreadFilter>,
) -> Result<Json<Vec<ChatThread>>, AppError> {
    let threads = state.read(|store| {
        store
            .chat_threads()
            .iter()
            .filter(|thread| {
                filter
                    .customer_id
                    .as_deref()
                    .is_none_or(|id| thread.customer_id == id)
            })
            .cloned()
            .collect()
    })?;
    Ok(Json(threads))
}

async fn create_thread(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateThreadRequest>,
) -> Result<Json<ChatThread>, AppError> {
    let thread = state
        .mutate("create_chat_thread", |store| {
            if !store.customers().contains(&payload.customer_id) {
                return Err(AppError::not_found("customer", &payload.customer_id));
            }
            Ok(store.create_chat_thread(&payload.customer_id, &payload.title))
        })
        .await?;
    Ok(Json(thread))
}

async fn add_chat_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AddChatMessageRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("content cannot be empty".to_string()));
    }

    let message = state
        .mutate("add_chat_message", |store| {
            store.add_chat_message(&id, payload.role, content)
        })
        .await?;
    Ok(Json(message))
}

/// A customer talking to the assistant; the reply follows on the event feed.
async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PostChatRequest>,
) -> Result<Json<ChatExchange>, AppError> {
    let exchange = post_customer_message(&state, &payload.customer_id, &payload.content).await?;
    Ok(Json(exchange))
}
