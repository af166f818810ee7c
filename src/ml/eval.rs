//! Alignment of actual and forecast series, summary statistics, and
//! forecast accuracy metrics.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use crate::models::{AlignedPoint, EvaluationMetrics, ForecastPoint, SummaryStats, TimePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The actual and forecast series share no dates.
    EmptyAlignment,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::EmptyAlignment => {
                write!(f, "no overlapping dates between actual and forecast series")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Inner join on exact date equality, stable over the actual series.
/// An empty result is a valid outcome, not an error.
pub fn align(actual: &[TimePoint], forecast: &[ForecastPoint]) -> Vec<AlignedPoint> {
    let by_date: HashMap<NaiveDate, f64> = forecast.iter().map(|p| (p.ds, p.yhat)).collect();

    actual
        .iter()
        .filter_map(|a| {
            by_date.get(&a.ds).map(|yhat| AlignedPoint {
                ds: a.ds,
                y: a.y,
                yhat: *yhat,
            })
        })
        .collect()
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Min/max/mean of a series, rounded to 4 decimals. `None` for an empty
/// series.
pub fn summarize(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }

    Some(SummaryStats {
        min: round_to(min, 4),
        max: round_to(max, 4),
        average: round_to(sum / values.len() as f64, 4),
    })
}

/// MAE, MAPE, and RMSE over the aligned series. Rows whose actual value is
/// exactly zero are excluded from MAPE; MAPE is `None` when every row is
/// excluded.
pub fn evaluate(aligned: &[AlignedPoint]) -> Result<EvaluationMetrics, EvalError> {
    if aligned.is_empty() {
        return Err(EvalError::EmptyAlignment);
    }

    let n = aligned.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut pct_sum = 0.0;
    let mut pct_n = 0usize;

    for p in aligned {
        let err = p.y - p.yhat;
        abs_sum += err.abs();
        sq_sum += err * err;
        if p.y != 0.0 {
            pct_sum += err.abs() / p.y.abs();
            pct_n += 1;
        }
    }

    let mape = (pct_n > 0).then(|| round_to(pct_sum / pct_n as f64 * 100.0, 2));

    Ok(EvaluationMetrics {
        mae: round_to(abs_sum / n, 4),
        mape,
        rmse: round_to((sq_sum / n).sqrt(), 4),
    })
}
