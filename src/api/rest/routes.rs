use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::route::{Route, RouteStatus, Stop};
use crate::state::AppState;
use crate::store::views::RouteProgress;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/routes", get(list_routes))
        .route("/routes/:id/stops", get(route_stops))
        .route("/routes/:id/progress", get(route_progress))
        .route("/routes/:id/driver", patch(assign_route))
        .route("/routes/:id/status", patch(update_route_status))
}

#[derive(Deserialize)]
pub struct AssignRouteRequest {
    pub driver_id: String,
}

#[derive(Deserialize)]
pub struct UpdateRouteStatusRequest {
    pub status: RouteStatus,
}

async fn list_routes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Route>>, AppError> {
    let routes = state.read(|store| store.routes().iter().cloned().collect())?;
    Ok(Json(routes))
}

async fn route_stops(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Stop>>, AppError> {
    let stops = state.read(|store| {
        if !store.routes().contains(&id) {
            return Err(AppError::not_found("route", &id));
        }
        Ok(store.stops_for_route(&id).into_iter().cloned().collect())
    })??;
    Ok(Json(stops))
}

async fn route_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RouteProgress>, AppError> {
    let progress = state.read(|store| store.route_progress(&id))??;
    Ok(Json(progress))
}

async fn assign_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRouteRequest>,
) -> Result<Json<Route>, AppError> {
    let route = state
        .mutate("assign_route", |store| {
            store.assign_route(&id, &payload.driver_id)
        })
        .await?;
    Ok(Json(route))
}

async fn update_route_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRouteStatusRequest>,
) -> Result<Json<Route>, AppError> {
    let route = state
        .mutate("update_route_status", |store| {
            store.update_route_status(&id, payload.status)
        })
        .await?;
    Ok(Json(route))
}
