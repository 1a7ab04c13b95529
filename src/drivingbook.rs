//! Driving-book normalisation.
//!
//! The backend returns every trip of a simulation as a loosely typed JSON
//! object. [`normalize_driving_book`] turns those into [`Trip`] values with
//! parsed timestamps, integer vehicle ids and a closed [`VehicleType`]
//! enumeration in place of the raw type codes.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Type code the backend uses for a trip no vehicle could serve.
pub const UNALLOCATED_CODE: i64 = -1;

/// Vehicle category attached to each side of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum VehicleType {
    Bike,
    EBike,
    ECar,
    FossilCar,
    Unallocated,
    /// Any code outside the known set, or no code at all.
    Other(Option<i64>),
}

impl VehicleType {
    pub fn code(&self) -> Option<i64> {
        match self {
            VehicleType::Bike => Some(1),
            VehicleType::EBike => Some(2),
            VehicleType::ECar => Some(3),
            VehicleType::FossilCar => Some(4),
            VehicleType::Unallocated => Some(UNALLOCATED_CODE),
            VehicleType::Other(code) => *code,
        }
    }
}

impl From<Option<i64>> for VehicleType {
    fn from(code: Option<i64>) -> Self {
        match code {
            Some(1) => VehicleType::Bike,
            Some(2) => VehicleType::EBike,
            Some(3) => VehicleType::ECar,
            Some(4) => VehicleType::FossilCar,
            Some(UNALLOCATED_CODE) => VehicleType::Unallocated,
            other => VehicleType::Other(other),
        }
    }
}

impl From<VehicleType> for Option<i64> {
    fn from(vehicle_type: VehicleType) -> Self {
        vehicle_type.code()
    }
}

/// Which of the two vehicle assignments carried by a trip to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The vehicle that actually drove the trip.
    Current,
    /// The vehicle the simulation assigned to it.
    Simulation,
}

/// A driving-book entry exactly as the backend sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrip {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub current_vehicle_id: Option<Value>,
    #[serde(default)]
    pub current_vehicle_name: Option<String>,
    #[serde(default)]
    pub current_type: Option<i64>,
    #[serde(default)]
    pub simulation_vehicle_id: Option<Value>,
    #[serde(default)]
    pub simulation_vehicle_name: Option<String>,
    #[serde(default)]
    pub simulation_type: Option<i64>,
}

/// A normalised driving-book entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Kilometres, never negative.
    pub distance: f64,
    pub current_vehicle_id: Option<i64>,
    pub current_vehicle_name: String,
    pub current_type: VehicleType,
    pub simulation_vehicle_id: Option<i64>,
    pub simulation_vehicle_name: String,
    pub simulation_type: VehicleType,
}

impl Trip {
    pub fn vehicle_type(&self, assignment: Assignment) -> VehicleType {
        match assignment {
            Assignment::Current => self.current_type,
            Assignment::Simulation => self.simulation_type,
        }
    }

    /// Calendar day the trip started on.
    pub fn day(&self) -> NaiveDate {
        self.start_time.date()
    }

    pub fn is_unallocated(&self) -> bool {
        self.simulation_type == VehicleType::Unallocated
    }

    /// Display form of every field, used by the free-text table filter.
    fn display_fields(&self) -> [String; 9] {
        let id = |id: Option<i64>| id.map(|v| v.to_string()).unwrap_or_default();
        let code = |t: VehicleType| t.code().map(|v| v.to_string()).unwrap_or_default();
        [
            self.start_time.format(TIMESTAMP_FORMAT).to_string(),
            self.end_time.format(TIMESTAMP_FORMAT).to_string(),
            self.distance.to_string(),
            id(self.current_vehicle_id),
            self.current_vehicle_name.clone(),
            code(self.current_type),
            id(self.simulation_vehicle_id),
            self.simulation_vehicle_name.clone(),
            code(self.simulation_type),
        ]
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a backend timestamp into local wall-clock time.
///
/// Offset-carrying timestamps are converted to the local zone; naive ones are
/// taken as already local. A bare date is read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn coerce_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn required_time(raw: Option<&str>, index: usize, field: &'static str) -> Result<NaiveDateTime> {
    let raw = raw.ok_or(PipelineError::MissingField { index, field })?;
    parse_timestamp(raw).ok_or_else(|| PipelineError::InvalidField {
        index,
        field,
        reason: format!("unrecognised timestamp `{raw}`"),
    })
}

/// Normalises a single raw trip; `index` is only used in error reports.
pub fn normalize_trip(index: usize, raw: &RawTrip) -> Result<Trip> {
    let start_time = required_time(raw.start_time.as_deref(), index, "start_time")?;
    let end_time = required_time(raw.end_time.as_deref(), index, "end_time")?;

    let distance = raw.distance.ok_or(PipelineError::MissingField {
        index,
        field: "distance",
    })?;
    if !distance.is_finite() || distance < 0.0 {
        return Err(PipelineError::InvalidField {
            index,
            field: "distance",
            reason: format!("expected a non-negative distance, got {distance}"),
        });
    }

    Ok(Trip {
        start_time,
        end_time,
        distance,
        current_vehicle_id: coerce_id(raw.current_vehicle_id.as_ref()),
        current_vehicle_name: raw.current_vehicle_name.as_deref().unwrap_or("").trim().to_string(),
        current_type: raw.current_type.into(),
        simulation_vehicle_id: coerce_id(raw.simulation_vehicle_id.as_ref()),
        simulation_vehicle_name: raw
            .simulation_vehicle_name
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string(),
        simulation_type: raw.simulation_type.into(),
    })
}

/// Normalises a whole driving book, failing on the first invalid entry.
pub fn normalize_driving_book(raw: &[RawTrip]) -> Result<Vec<Trip>> {
    let trips = raw
        .iter()
        .enumerate()
        .map(|(index, trip)| normalize_trip(index, trip))
        .collect::<Result<Vec<_>>>()?;
    debug!(trips = trips.len(), "Driving book normalised");
    Ok(trips)
}

/// Keeps the trips where any field contains `text`, ignoring case.
pub fn filter_trips<'a>(trips: &'a [Trip], text: &str) -> Vec<&'a Trip> {
    if text.is_empty() {
        return trips.iter().collect();
    }
    let needle = text.to_lowercase();
    trips
        .iter()
        .filter(|trip| {
            trip.display_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
