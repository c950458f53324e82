use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::views::{Analytics, DispatchOverview};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dispatch/overview", get(overview))
        .route("/analytics", get(analytics))
        .route("/reset", post(reset))
}

async fn overview(State(state): State<Arc<AppState>>) -> Result<Json<DispatchOverview>, AppError> {
    let overview = state.read(|store| store.dispatch_overview())?;
    Ok(Json(overview))
}

async fn analytics(State(state): State<Arc<AppState>>) -> Result<Json<Analytics>, AppError> {
    let analytics = state.read(|store| store.analytics())?;
    Ok(Json(analytics))
}

async fn reset(State(state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    state
        .mutate("reset_data", |store| {
            store.reset_data();
            Ok(())
        })
        .await?;
    info!("store reset to demo seed");
    Ok(StatusCode::NO_CONTENT)
}
