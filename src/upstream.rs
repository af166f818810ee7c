use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::errors::AppError;
use crate::models::TimePoint;

/// Client for the upstream energy/emissions trend API.
#[derive(Clone)]
pub struct EnergyApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnergyApiClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Trailing three-year observation window, current year inclusive.
    pub fn query_window() -> (i32, i32) {
        let year = Utc::now().year();
        (year - 2, year)
    }

    /// Fetch the actual monthly series for the trailing window.
    pub async fn fetch_actual(&self) -> Result<Vec<TimePoint>, AppError> {
        let (start_year, end_year) = Self::query_window();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("start_year", start_year.to_string()),
                ("end_year", end_year.to_string()),
                ("start_month", "01".to_string()),
                ("end_month", "12".to_string()),
                ("is_emission", "false".to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            tracing::error!(status = %resp.status(), "Energy API returned an error");
            return Err(AppError::upstream());
        }

        let payload: Value = resp.json().await?;
        Ok(parse_trend_payload(&payload))
    }
}

/// Flatten `data.trendData[]` entries for the "All" line into monthly points.
/// Rows with an unusable year/month or a missing/non-finite index value are
/// dropped rather than null-filled.
pub fn parse_trend_payload(payload: &Value) -> Vec<TimePoint> {
    let mut points = Vec::new();
    let Some(entries) = payload["data"]["trendData"].as_array() else {
        return points;
    };

    for entry in entries {
        if entry["line"].as_str() != Some("All") {
            continue;
        }
        let Some(rows) = entry["data"].as_array() else {
            continue;
        };
        for row in rows {
            let (Some(year), Some(month)) = (int_field(&row["year"]), int_field(&row["month"]))
            else {
                continue;
            };
            if !(1..=12).contains(&month) {
                continue;
            }
            let Some(ds) = NaiveDate::from_ymd_opt(year as i32, month as u32, 1) else {
                continue;
            };
            let Some(y) = row["values"]["indexEnergy"].as_f64().filter(|v| v.is_finite()) else {
                continue;
            };
            points.push(TimePoint { ds, y });
        }
    }

    points
}

// The upstream emits year/month sometimes as numbers, sometimes as numeric
// strings.
fn int_field(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn extracts_all_line_entries_only() {
        let payload = json!({
            "data": {
                "trendData": [
                    {
                        "line": "All",
                        "data": [
                            {"year": 2024, "month": 1, "values": {"indexEnergy": 101.5}},
                            {"year": 2024, "month": 2, "values": {"indexEnergy": 98.2}},
                        ]
                    },
                    {
                        "line": "Line A",
                        "data": [
                            {"year": 2024, "month": 1, "values": {"indexEnergy": 55.0}},
                        ]
                    }
                ]
            }
        });

        let points = parse_trend_payload(&payload);
        assert_eq!(
            points,
            vec![
                TimePoint { ds: date(2024, 1), y: 101.5 },
                TimePoint { ds: date(2024, 2), y: 98.2 },
            ]
        );
    }

    #[test]
    fn single_digit_months_produce_valid_dates() {
        // The upstream does not zero-pad months; constructing dates from the
        // numeric fields must not depend on string formatting.
        let payload = json!({
            "data": {
                "trendData": [{
                    "line": "All",
                    "data": [
                        {"year": "2023", "month": "3", "values": {"indexEnergy": 90.0}},
                        {"year": 2023, "month": 11, "values": {"indexEnergy": 91.0}},
                    ]
                }]
            }
        });

        let points = parse_trend_payload(&payload);
        assert_eq!(points[0].ds, date(2023, 3));
        assert_eq!(points[1].ds, date(2023, 11));
    }

    #[test]
    fn unusable_rows_are_dropped() {
        let payload = json!({
            "data": {
                "trendData": [{
                    "line": "All",
                    "data": [
                        {"year": 2024, "month": 13, "values": {"indexEnergy": 1.0}},
                        {"year": 2024, "month": 4, "values": {"indexEnergy": null}},
                        {"year": 2024, "month": 5, "values": {}},
                        {"year": "n/a", "month": 6, "values": {"indexEnergy": 2.0}},
                        {"year": 2024, "month": 7, "values": {"indexEnergy": 103.0}},
                    ]
                }]
            }
        });

        let points = parse_trend_payload(&payload);
        assert_eq!(points, vec![TimePoint { ds: date(2024, 7), y: 103.0 }]);
    }

    #[test]
    fn malformed_payload_yields_empty_series() {
        assert!(parse_trend_payload(&json!({})).is_empty());
        assert!(parse_trend_payload(&json!({"data": {"trendData": "oops"}})).is_empty());
        assert!(parse_trend_payload(&json!([1, 2, 3])).is_empty());
    }
}
