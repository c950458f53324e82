use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};

use crate::error::AppError;
use crate::models::alert::{Alert, AlertDraft};
use crate::models::message::{Message, MessageDraft};
use crate::models::notification::{Notification, NotificationDraft};
use crate::models::review::{Review, ReviewDraft};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", post(add_review))
        .route("/messages", get(list_messages).post(send_message))
        .route("/messages/:id/read", patch(mark_message_read))
        .route(
            "/notifications",
            get(list_notifications).post(add_notification),
        )
        .route("/notifications/:id/read", patch(mark_notification_read))
        .route("/alerts", get(list_alerts).post(add_alert))
        .route("/alerts/:id/resolve", patch(resolve_alert))
}

async fn add_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReviewDraft>,
) -> Result<Json<Review>, AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let draft = ReviewDraft {
        comment: payload.comment.filter(|c| !c.trim().is_empty()),
        ..payload
    };
    let review = state.mutate("add_review", |store| store.add_review(draft)).await?;
    Ok(Json(review))
}

async fn list_messages(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.read(|store| store.messages().iter().cloned().collect())?;
    Ok(Json(messages))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MessageDraft>,
) -> Result<Json<Message>, AppError> {
    let content = payload.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("content cannot be empty".to_string()));
    }

    let draft = MessageDraft { content, ..payload };
    let message = state.mutate("send_message", |store| Ok(store.send_message(draft))).await?;
    Ok(Json(message))
}

async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.mutate("mark_message_read", |store| store.mark_message_read(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.read(|store| store.notifications().iter().cloned().collect())?;
    Ok(Json(notifications))
}

async fn add_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotificationDraft>,
) -> Result<Json<Notification>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }

    let notification = state
        .mutate("add_notification", |store| {
            Ok(store.add_notification(payload))
        })
        .await?;
    Ok(Json(notification))
}

async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .mutate("mark_notification_read", |store| {
            store.mark_notification_read(&id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_alerts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = state.read(|store| store.alerts().iter().cloned().collect())?;
    Ok(Json(alerts))
}

async fn add_alert(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AlertDraft>,
) -> Result<Json<Alert>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }

    let alert = state.mutate("add_alert", |store| Ok(store.add_alert(payload))).await?;
    Ok(Json(alert))
}

async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.mutate("resolve_alert", |store| store.resolve_alert(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
