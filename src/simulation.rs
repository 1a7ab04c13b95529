//! Backend simulation payloads.
//!
//! Simulations run asynchronously on the backend. A job document carries the
//! job status and, once finished, the raw result that the rest of this crate
//! turns into charts and tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drivingbook::RawTrip;

/// State of a backend simulation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Started,
    Progress,
    Success,
    Failure,
    Other(String),
}

impl JobStatus {
    /// True while the backend is still working on the job.
    pub fn is_running(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Started | JobStatus::Progress)
    }
}

impl From<String> for JobStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "PENDING" => JobStatus::Pending,
            "STARTED" => JobStatus::Started,
            "PROGRESS" => JobStatus::Progress,
            "SUCCESS" => JobStatus::Success,
            "FAILURE" => JobStatus::Failure,
            _ => JobStatus::Other(status),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Pending => "PENDING".to_string(),
            JobStatus::Started => "STARTED".to_string(),
            JobStatus::Progress => "PROGRESS".to_string(),
            JobStatus::Success => "SUCCESS".to_string(),
            JobStatus::Failure => "FAILURE".to_string(),
            JobStatus::Other(other) => other,
        }
    }
}

/// Per-vehicle usage objects for both fleets, left loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleUsage {
    #[serde(default)]
    pub current: Vec<Value>,
    #[serde(default)]
    pub simulation: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTables {
    #[serde(default)]
    pub vehicle_usage: VehicleUsage,
}

/// Finished fleet simulation as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSimulationResult {
    #[serde(default)]
    pub unallocated: u64,
    #[serde(default)]
    pub number_of_trips: u64,
    #[serde(default)]
    pub driving_book: Vec<RawTrip>,
    #[serde(default)]
    pub results: ResultTables,
    /// Echo of the request; only passed through.
    #[serde(default)]
    pub simulation_options: Value,
}

/// A fleet simulation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<FleetSimulationResult>,
}

/// Driving book and usage tables of one goal-search solution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSolutionTables {
    #[serde(default)]
    pub driving_book: Vec<RawTrip>,
    #[serde(default)]
    pub results: ResultTables,
}

/// One candidate fleet proposed by the backend's goal search. Unlike fleet
/// simulations, solutions carry precomputed expense and emission totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSolution {
    #[serde(default)]
    pub unallocated: u64,
    #[serde(default)]
    pub current_expense: f64,
    #[serde(default)]
    pub simulation_expense: f64,
    #[serde(default)]
    pub current_co2e: f64,
    #[serde(default)]
    pub simulation_co2e: f64,
    #[serde(default)]
    pub results: Option<GoalSolutionTables>,
}

/// Finished goal search: several candidate fleets for one set of options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSimulationResult {
    #[serde(default)]
    pub solutions: Vec<GoalSolution>,
    #[serde(default)]
    pub simulation_options: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_status_round_trip() {
        let status: JobStatus = serde_json::from_value(json!("PROGRESS")).unwrap();
        assert_eq!(status, JobStatus::Progress);
        assert!(status.is_running());

        let unknown: JobStatus = serde_json::from_value(json!("REVOKED")).unwrap();
        assert_eq!(unknown, JobStatus::Other("REVOKED".to_string()));
        assert!(!unknown.is_running());
        assert_eq!(serde_json::to_value(unknown).unwrap(), json!("REVOKED"));
    }

    #[test]
    fn test_pending_job_without_result() {
        let job: SimulationJob =
            serde_json::from_value(json!({"id": "abc", "status": "PENDING"})).unwrap();

        assert!(job.status.is_running());
        assert!(job.result.is_none());
    }
}
