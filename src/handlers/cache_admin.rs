use axum::extract::State;

use crate::handlers::AppState;

pub async fn clear_cache(State(state): State<AppState>) -> &'static str {
    state.cache.clear().await;
    tracing::info!("Forecast cache cleared");
    "Cache cleared"
}
