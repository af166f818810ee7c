/// ETS trend model backing the forecast endpoints, via the `augurs` crate.
/// The model is fitted once at process start from a JSON training artifact.
use std::path::Path;

use anyhow::{anyhow, Context};
use augurs::ets::{AutoETS, FittedAutoETS};
use augurs::prelude::*;
use chrono::{Months, NaiveDate};

use crate::models::{ForecastPoint, TimePoint};
use crate::upstream::EnergyApiClient;

/// Narrow model boundary: point predictions over the full training index
/// extended by `periods` additional monthly steps.
pub trait TrendModel: Send + Sync {
    fn predict_extended(&self, periods: usize) -> anyhow::Result<Vec<ForecastPoint>>;
}

pub struct EtsTrendModel {
    fitted: FittedAutoETS,
    training_dates: Vec<NaiveDate>,
    training_end: NaiveDate,
}

impl EtsTrendModel {
    /// Load the training artifact and fit the model. Called once at startup.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading model artifact {}", path.as_ref().display()))?;
        let history: Vec<TimePoint> =
            serde_json::from_str(&raw).context("parsing model artifact")?;
        Self::fit(history)
    }

    pub fn fit(mut history: Vec<TimePoint>) -> anyhow::Result<Self> {
        if history.is_empty() {
            return Err(anyhow!("model artifact contains no observations"));
        }
        history.sort_by_key(|p| p.ds);

        let values: Vec<f64> = history.iter().map(|p| p.y).collect();
        let mut ets = AutoETS::non_seasonal();
        let fitted = ets.fit(&values).map_err(|e| anyhow!("ETS fit error: {e}"))?;

        let training_dates: Vec<NaiveDate> = history.iter().map(|p| p.ds).collect();
        let training_end = training_dates[training_dates.len() - 1];

        Ok(Self {
            fitted,
            training_dates,
            training_end,
        })
    }
}

impl TrendModel for EtsTrendModel {
    fn predict_extended(&self, periods: usize) -> anyhow::Result<Vec<ForecastPoint>> {
        let in_sample = self
            .fitted
            .predict_in_sample(None)
            .map_err(|e| anyhow!("ETS in-sample predict error: {e}"))?;
        let future = self
            .fitted
            .predict(periods, None)
            .map_err(|e| anyhow!("ETS predict error: {e}"))?;

        let mut points: Vec<ForecastPoint> = self
            .training_dates
            .iter()
            .zip(in_sample.point.iter())
            .map(|(ds, yhat)| ForecastPoint { ds: *ds, yhat: *yhat })
            .collect();

        let mut ds = self.training_end;
        for yhat in &future.point {
            ds = ds + Months::new(1);
            points.push(ForecastPoint { ds, yhat: *yhat });
        }

        Ok(points)
    }
}

/// Window the dashboard displays: January two years back through December of
/// next year, at monthly granularity.
pub fn dashboard_window() -> (NaiveDate, NaiveDate) {
    let (start_year, end_year) = EnergyApiClient::query_window();
    (
        NaiveDate::from_ymd_opt(start_year, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(end_year + 1, 12, 1).unwrap(),
    )
}

/// Extended-index predictions restricted to `[start, end]`.
pub fn forecast_window(
    model: &dyn TrendModel,
    periods: usize,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<ForecastPoint>> {
    let mut points = model.predict_extended(periods)?;
    points.retain(|p| p.ds >= start && p.ds <= end);
    Ok(points)
}
