pub mod cache_admin;
pub mod evaluation;
pub mod pages;
pub mod series;

use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::ml::model::TrendModel;
use crate::upstream::EnergyApiClient;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: EnergyApiClient,
    pub model: Arc<dyn TrendModel>,
    pub cache: ResponseCache,
    /// Months predicted beyond the model's training index.
    pub horizon: usize,
}
