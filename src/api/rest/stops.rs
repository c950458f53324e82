use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::customer::ServiceType;
use crate::models::driver::GeoPoint;
use crate::models::route::{Stop, StopDraft, StopStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stops", get(list_stops).post(create_stop))
        .route("/stops/:id", delete(remove_stop))
        .route("/stops/:id/status", patch(update_stop_status))
        .route("/stops/:id/complete", post(complete_stop))
}

#[derive(Deserialize)]
pub struct CreateStopRequest {
    pub route_id: String,
    pub customer_id: String,
    pub scheduled_time: String,
    pub service_type: Option<ServiceType>,
    pub address: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub notes: Option<String>,
    pub bin_location: Option<String>,
    pub access_code: Option<String>,
    pub sequence: Option<u32>,
}

#[derive(Deserialize)]
pub struct UpdateStopStatusRequest {
    pub status: StopStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CompleteStopRequest {
    pub photo_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn list_stops(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Stop>>, AppError> {
    let stops = state.read(|store| store.stops().iter().cloned().collect())?;
    Ok(Json(stops))
}

/// Anything the dispatcher leaves out is filled from the customer record;
/// the sequence defaults to the end of the route.
async fn create_stop(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateStopRequest>,
) -> Result<Json<Stop>, AppError> {
    if NaiveTime::parse_from_str(&payload.scheduled_time, "%H:%M").is_err() {
        return Err(AppError::BadRequest(format!(
            "scheduled_time must be HH:MM, got {:?}",
            payload.scheduled_time
        )));
    }

    let stop = state
        .mutate("add_stop", |store| {
            let customer = store
                .customers()
                .get(&payload.customer_id)
                .ok_or_else(|| AppError::not_found("customer", &payload.customer_id))?;

            let address = non_blank(payload.address).unwrap_or_else(|| customer.address.clone());
            let draft = StopDraft {
                route_id: payload.route_id.clone(),
                customer_id: customer.id.clone(),
                address,
                coordinates: payload.coordinates.unwrap_or(customer.coordinates),
                scheduled_time: payload.scheduled_time,
                status: StopStatus::Pending,
                service_type: payload.service_type.unwrap_or(customer.service_type),
                notes: non_blank(payload.notes),
                bin_location: non_blank(payload.bin_location)
                    .or_else(|| non_blank(Some(customer.bin_location.clone()))),
                access_code: non_blank(payload.access_code).or_else(|| customer.access_code.clone()),
                sequence: payload
                    .sequence
                    .unwrap_or_else(|| store.stops_for_route(&payload.route_id).len() as u32 + 1),
            };

            store.add_stop(draft)
        })
        .await?;
    Ok(Json(stop))
}

async fn remove_stop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Stop>, AppError> {
    let stop = state.mutate("remove_stop", |store| store.remove_stop(&id)).await?;
    Ok(Json(stop))
}

async fn update_stop_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStopStatusRequest>,
) -> Result<Json<Stop>, AppError> {
    let stop = state
        .mutate("update_stop_status", |store| {
            store.update_stop_status(&id, payload.status, payload.notes)
        })
        .await?;
    Ok(Json(stop))
}

async fn complete_stop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Option<Json<CompleteStopRequest>>,
) -> Result<Json<Stop>, AppError> {
    let photo_url = payload.and_then(|Json(body)| non_blank(body.photo_url));

    let stop = state
        .mutate("complete_stop", |store| store.complete_stop(&id, photo_url))
        .await?;
    state.metrics.stop_completions_total.inc();
    Ok(Json(stop))
}
