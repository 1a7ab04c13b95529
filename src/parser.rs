//! JSON decoding of backend documents.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::charts::types::LocationActivity;
use crate::simulation::{FleetSimulationResult, SimulationJob};
use crate::vehicles::Vehicle;

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(bytes).with_context(|| format!("failed to decode {what}"))
}

/// Decodes a simulation job document (`{ id, status, result }`).
pub fn parse_simulation(bytes: &[u8]) -> Result<SimulationJob> {
    decode(bytes, "simulation job")
}

/// Decodes a bare fleet simulation result.
pub fn parse_fleet_result(bytes: &[u8]) -> Result<FleetSimulationResult> {
    decode(bytes, "fleet simulation result")
}

/// Accepts either a job document or a bare result. Documents carrying a
/// `status` are read as jobs.
///
/// # Errors
///
/// Fails if the bytes are neither, or if the job has no result yet.
pub fn parse_result_document(bytes: &[u8]) -> Result<FleetSimulationResult> {
    let document: Value = decode(bytes, "simulation document")?;
    if document.get("status").is_none() {
        return serde_json::from_value(document).context("failed to decode fleet simulation result");
    }

    let job: SimulationJob =
        serde_json::from_value(document).context("failed to decode simulation job")?;
    job.result
        .with_context(|| format!("simulation {} has no result (status {:?})", job.id, job.status))
}

/// Decodes a vehicle list.
pub fn parse_vehicles(bytes: &[u8]) -> Result<Vec<Vehicle>> {
    decode(bytes, "vehicle list")
}

/// Decodes per-location weekly activity.
pub fn parse_location_activity(bytes: &[u8]) -> Result<Vec<LocationActivity>> {
    decode(bytes, "location activity")
}
