use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::handlers::series::cached_forecast;
use crate::handlers::AppState;
use crate::ml::eval::{align, evaluate, summarize};
use crate::models::{EvaluationMetrics, SummaryResponse};

/// Per-series min/max/mean over the actual and forecast series. Either side
/// can be null when its source series is empty.
pub async fn summary_data(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let actual = state.upstream.fetch_actual().await?;
    let forecast = cached_forecast(&state).await?;

    let actual_values: Vec<f64> = actual.iter().map(|p| p.y).collect();
    let forecast_values: Vec<f64> = forecast.iter().map(|p| p.yhat).collect();

    Ok(Json(SummaryResponse {
        summary_actual: summarize(&actual_values),
        summary_forecast: summarize(&forecast_values),
    }))
}

/// Accuracy metrics over the inner join of actual and forecast series.
/// 400 when the series share no dates.
pub async fn model_evaluation(
    State(state): State<AppState>,
) -> Result<Json<EvaluationMetrics>, AppError> {
    let actual = state.upstream.fetch_actual().await?;
    let forecast = cached_forecast(&state).await?;

    let aligned = align(&actual, &forecast);
    let metrics = evaluate(&aligned).map_err(|_| {
        AppError::bad_request("No overlapping data between actual and forecast series")
    })?;

    Ok(Json(metrics))
}
