use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::ml::model::{dashboard_window, forecast_window};
use crate::models::{ForecastPoint, TimePoint};

pub const FORECAST_CACHE_KEY: &str = "forecast_data";

pub async fn actual_data(State(state): State<AppState>) -> Result<Json<Vec<TimePoint>>, AppError> {
    let points = state.upstream.fetch_actual().await?;
    Ok(Json(points))
}

pub async fn forecast_data(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = cached_forecast_json(&state).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Serialized forecast JSON, produced through the TTL cache so repeated
/// requests within the window reuse a single model inference and return
/// byte-identical bodies.
pub async fn cached_forecast_json(state: &AppState) -> Result<String, AppError> {
    let model = state.model.clone();
    let horizon = state.horizon;

    state
        .cache
        .get_or_compute(FORECAST_CACHE_KEY, move || async move {
            let (start, end) = dashboard_window();
            let points = forecast_window(model.as_ref(), horizon, start, end)?;
            Ok(serde_json::to_string(&points)?)
        })
        .await
        .map_err(AppError::from)
}

/// Forecast series for in-process consumers (summary, evaluation). Reads
/// through the same cache as `/forecast_data`.
pub async fn cached_forecast(state: &AppState) -> Result<Vec<ForecastPoint>, AppError> {
    let body = cached_forecast_json(state).await?;
    serde_json::from_str(&body)
        .map_err(|e| AppError::internal(format!("corrupt cached forecast: {e}")))
}
