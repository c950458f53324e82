use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::customer::Customer;
use crate::models::notification::Notification;
use crate::state::AppState;
use crate::store::views::CustomerHome;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", get(list_customers))
        .route(
            "/customers/current",
            get(current_customer).put(set_current_customer),
        )
        .route("/customers/:id/notifications", get(customer_notifications))
        .route("/customers/:id/home", get(customer_home))
}

#[derive(Deserialize)]
pub struct SetCurrentCustomerRequest {
    pub customer_id: Option<String>,
}

async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.read(|store| store.customers().iter().cloned().collect())?;
    Ok(Json(customers))
}

async fn current_customer(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Customer>>, AppError> {
    let customer = state.read(|store| store.current_customer().cloned())?;
    Ok(Json(customer))
}

async fn set_current_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetCurrentCustomerRequest>,
) -> Result<Json<Option<Customer>>, AppError> {
    let customer = state
        .mutate("set_current_customer", |store| {
            store.set_current_customer(payload.customer_id)?;
            Ok(store.current_customer().cloned())
        })
        .await?;
    Ok(Json(customer))
}

async fn customer_notifications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.read(|store| {
        if !store.customers().contains(&id) {
            return Err(AppError::not_found("customer", &id));
        }
        Ok(store
            .notifications_for_customer(&id)
            .into_iter()
            .cloned()
            .collect())
    })??;
    Ok(Json(notifications))
}

async fn customer_home(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerHome>, AppError> {
    let home = state.read(|store| store.customer_home(&id))??;
    Ok(Json(home))
}
