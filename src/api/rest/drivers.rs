use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::driver::{Driver, DriverStatus, GeoPoint};
use crate::models::message::Message;
use crate::models::review::Review;
use crate::models::route::Route;
use crate::state::AppState;
use crate::store::Store;
use crate::store::views::{Conversation, DriverDashboard, RatingBreakdown};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers))
        .route(
            "/drivers/current",
            get(current_driver).put(set_current_driver),
        )
        .route("/drivers/:id/status", patch(update_driver_status))
        .route("/drivers/:id/location", patch(update_driver_location))
        .route("/drivers/:id/routes", get(driver_routes))
        .route("/drivers/:id/messages", get(driver_messages))
        .route("/drivers/:id/reviews", get(driver_reviews))
        .route("/drivers/:id/ratings", get(driver_ratings))
        .route("/drivers/:id/dashboard", get(driver_dashboard))
        .route("/drivers/:id/conversations", get(driver_conversations))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DriverStatus,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

#[derive(Deserialize)]
pub struct SetCurrentDriverRequest {
    pub driver_id: Option<String>,
}

fn known_driver(store: &Store, id: &str) -> Result<(), AppError> {
    if store.drivers().contains(id) {
        Ok(())
    } else {
        Err(AppError::not_found("driver", id))
    }
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Driver>>, AppError> {
    let drivers = state.read(|store| store.drivers().iter().cloned().collect())?;
    Ok(Json(drivers))
}

async fn current_driver(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Driver>>, AppError> {
    let driver = state.read(|store| store.current_driver().cloned())?;
    Ok(Json(driver))
}

async fn set_current_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetCurrentDriverRequest>,
) -> Result<Json<Option<Driver>>, AppError> {
    let driver = state
        .mutate("set_current_driver", |store| {
            store.set_current_driver(payload.driver_id)?;
            Ok(store.current_driver().cloned())
        })
        .await?;
    Ok(Json(driver))
}

async fn update_driver_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .mutate("update_driver_status", |store| {
            store.update_driver_status(&id, payload.status)
        })
        .await?;
    Ok(Json(driver))
}

async fn update_driver_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Driver>, AppError> {
    let GeoPoint { lat, lng } = payload.location;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: {lat}, {lng}"
        )));
    }

    let driver = state
        .mutate("update_driver_location", |store| {
            store.update_driver_location(&id, lat, lng)
        })
        .await?;
    Ok(Json(driver))
}

async fn driver_routes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Route>>, AppError> {
    let routes = state.read(|store| {
        known_driver(store, &id)?;
        Ok::<_, AppError>(store.routes_for_driver(&id).into_iter().cloned().collect())
    })??;
    Ok(Json(routes))
}

async fn driver_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.read(|store| {
        known_driver(store, &id)?;
        Ok::<_, AppError>(store.messages_for_driver(&id).into_iter().cloned().collect())
    })??;
    Ok(Json(messages))
}

async fn driver_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, AppError> {
    let reviews = state.read(|store| {
        known_driver(store, &id)?;
        Ok::<_, AppError>(store.reviews_for_driver(&id).into_iter().cloned().collect())
    })??;
    Ok(Json(reviews))
}

async fn driver_ratings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RatingBreakdown>, AppError> {
    let breakdown = state.read(|store| store.rating_breakdown(&id))??;
    Ok(Json(breakdown))
}

async fn driver_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DriverDashboard>, AppError> {
    let dashboard = state.read(|store| store.driver_dashboard(&id))??;
    Ok(Json(dashboard))
}

async fn driver_conversations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state.read(|store| {
        known_driver(store, &id)?;
        Ok::<_, AppError>(store.customer_conversations(&id))
    })??;
    Ok(Json(conversations))
}
