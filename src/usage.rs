//! Vehicle-usage rows.
//!
//! The backend reports per-vehicle usage as JSON objects keyed by Danish
//! labels. Numeric columns arrive as numbers, numeric strings or
//! `{ "parsedValue": .., "source": .. }` wrappers depending on how the value
//! was produced, so every read goes through [`NumberField`].

use serde::Serialize;
use serde_json::{Map, Value};

pub const VEHICLE: &str = "Køretøj";
pub const ALLOCATED_KM: &str = "Allokerede km";
pub const ANNUAL_KM: &str = "Årlig km";
pub const WLTP: &str = "WLTP";
pub const ALLOCATED_EMISSION: &str = "Udledning for allokeret (kg CO2e)";
pub const ANNUAL_EMISSION: &str = "Årlig udledning (kg CO2e)";
pub const ANNUAL_COST: &str = "Årlig Omkostning kr";
pub const ANNUAL_OPERATING_COST: &str = "Årlig Driftsomkostning kr";
pub const ANNUAL_SOCIOECONOMIC_COST: &str = "Årlig Samfundsøkonomisk Omkostning kr";
pub const TOTAL_ANNUAL_COST: &str = "Samlet Årlig Omkostning kr";

/// The encodings a numeric usage field can arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberField<'a> {
    Number(f64),
    Text(&'a str),
    Wrapped { parsed_value: Option<f64> },
    /// `null`, booleans, arrays and absent fields.
    Unsupported,
}

impl<'a> NumberField<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Number(n)) => NumberField::Number(n.as_f64().unwrap_or(0.0)),
            Some(Value::String(s)) => NumberField::Text(s),
            Some(Value::Object(map)) => NumberField::Wrapped {
                parsed_value: map.get("parsedValue").and_then(Value::as_f64),
            },
            _ => NumberField::Unsupported,
        }
    }

    /// Numeric value of the field; anything unreadable counts as 0.
    pub fn value(&self) -> f64 {
        match self {
            NumberField::Number(n) => *n,
            NumberField::Text(s) => parse_float(s).unwrap_or(0.0),
            NumberField::Wrapped { parsed_value } => parsed_value.unwrap_or(0.0),
            NumberField::Unsupported => 0.0,
        }
    }
}

/// Reads a numeric usage field. Total: never fails, falls back to 0.
pub fn get_number_value(value: Option<&Value>) -> f64 {
    NumberField::classify(value).value()
}

/// Parses the longest leading decimal literal of `s`, ignoring leading
/// whitespace, so `"12.5 km"` reads as 12.5.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// WLTP is either a plain descriptor or an object naming its source.
fn wltp_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(map)) => text_value(map.get("source")),
        other => text_value(other),
    }
}

/// One row of the vehicle-usage table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleUsageRow {
    #[serde(rename = "Køretøj")]
    pub vehicle: String,
    #[serde(rename = "Allokerede km")]
    pub allocated_km: f64,
    #[serde(rename = "Årlig km")]
    pub annual_km: f64,
    #[serde(rename = "WLTP")]
    pub wltp: String,
    #[serde(rename = "Udledning for allokeret (kg CO2e)")]
    pub allocated_emission: f64,
    #[serde(rename = "Årlig udledning (kg CO2e)")]
    pub annual_emission: f64,
    #[serde(rename = "Årlig Omkostning kr")]
    pub annual_cost: f64,
    #[serde(rename = "Årlig Driftsomkostning kr")]
    pub annual_operating_cost: f64,
    #[serde(rename = "Årlig Samfundsøkonomisk Omkostning kr")]
    pub annual_socioeconomic_cost: f64,
    #[serde(rename = "Samlet Årlig Omkostning kr")]
    pub total_annual_cost: f64,
}

impl VehicleUsageRow {
    /// Converts one backend usage object. Each field is read on its own, so
    /// a bad value in one column never affects another.
    pub fn from_item(item: &Map<String, Value>) -> Self {
        let number = |key: &str| get_number_value(item.get(key));
        Self {
            vehicle: text_value(item.get(VEHICLE)),
            allocated_km: number(ALLOCATED_KM),
            annual_km: number(ANNUAL_KM),
            wltp: wltp_value(item.get(WLTP)),
            allocated_emission: number(ALLOCATED_EMISSION),
            annual_emission: number(ANNUAL_EMISSION),
            annual_cost: number(ANNUAL_COST),
            annual_operating_cost: number(ANNUAL_OPERATING_COST),
            annual_socioeconomic_cost: number(ANNUAL_SOCIOECONOMIC_COST),
            total_annual_cost: number(TOTAL_ANNUAL_COST),
        }
    }
}

/// Converts a list of usage objects; entries that are not JSON objects are
/// read as empty rows.
pub fn convert_usage(items: &[Value]) -> Vec<VehicleUsageRow> {
    let empty = Map::new();
    items
        .iter()
        .map(|item| VehicleUsageRow::from_item(item.as_object().unwrap_or(&empty)))
        .collect()
}
