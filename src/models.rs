use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The dashboard expects JSON null for unusable values, never NaN.
fn finite_or_null<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

fn null_as_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One observed monthly value from the upstream energy API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub ds: NaiveDate,
    #[serde(serialize_with = "finite_or_null", deserialize_with = "null_as_nan")]
    pub y: f64,
}

/// One predicted monthly value from the trend model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    #[serde(serialize_with = "finite_or_null", deserialize_with = "null_as_nan")]
    pub yhat: f64,
}

/// One row of the inner join of actual and forecast series on date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub ds: NaiveDate,
    pub y: f64,
    pub yhat: f64,
}

/// Descriptive statistics for a single series, rounded to 4 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary_actual: Option<SummaryStats>,
    pub summary_forecast: Option<SummaryStats>,
}

/// Forecast accuracy over the aligned series. MAPE is a percentage and is
/// null when no aligned row has a non-zero actual value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "MAPE")]
    pub mape: Option<f64>,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_serialize_as_null() {
        let point = TimePoint {
            ds: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            y: f64::NAN,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["y"], serde_json::Value::Null);
        assert_eq!(json["ds"], "2024-01-01");
    }

    #[test]
    fn forecast_point_round_trips() {
        let point = ForecastPoint {
            ds: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            yhat: 103.25,
        };
        let json = serde_json::to_string(&point).unwrap();
        let back: ForecastPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
