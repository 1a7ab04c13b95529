//! Data types shared by the chart aggregators.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single `(x, y)` point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point<Y> {
    pub x: String,
    pub y: Y,
}

/// A named series, serialised as `{ "id": .., "data": [{ "x", "y" }] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<Y> {
    pub id: String,
    pub data: Vec<Point<Y>>,
}

/// One bar of the trip-distance histogram, counted per vehicle category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub label: String,
    /// Lower bound of the bucket, used for ordering.
    pub km: f64,
    #[serde(rename = "Cykel")]
    pub bike: usize,
    #[serde(rename = "El-cykel")]
    pub e_bike: usize,
    #[serde(rename = "El-bil")]
    pub e_car: usize,
    #[serde(rename = "Fossil-bil")]
    pub fossil_car: usize,
    #[serde(rename = "Ikke tildelt")]
    pub unassigned: usize,
}

impl DistributionRow {
    pub fn total(&self) -> usize {
        self.bike + self.e_bike + self.e_car + self.fossil_car + self.unassigned
    }
}

/// A sparse weekly observation reported for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekObservation {
    /// ISO year-week, e.g. `2024-07`.
    pub x: String,
    pub y: f64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Weekly activity of one location as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationActivity {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub address: String,
    pub data: Vec<WeekObservation>,
}

/// One heatmap cell; every location carries the same ordered set of weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub x: String,
    pub y: f64,
    pub start_date: String,
    pub end_date: String,
}

/// A heatmap row, keyed by address for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub id: String,
    pub address: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    pub data: Vec<HeatmapCell>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}
