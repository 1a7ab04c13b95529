//! Trait and polling for the fleet simulation backend.

use anyhow::{Result, bail};
use fleet_charts::simulation::{JobStatus, SimulationJob};
use std::time::Duration;
use tracing::{debug, info};

/// Abstraction over the backend that runs fleet simulations.
#[async_trait::async_trait]
pub trait FleetApi: Send + Sync {
    /// Returns the current state of a fleet simulation job.
    async fn get_fleet_simulation(&self, id: &str) -> Result<SimulationJob>;
}

/// Polls a simulation until it leaves the running states.
///
/// Sleeps `interval` between polls and gives up after `max_polls` polls.
/// A job that ends in `FAILURE` is an error; any other final status is
/// returned to the caller.
#[tracing::instrument(skip(api, interval), fields(simulation_id = %id))]
pub async fn wait_for_simulation<A: FleetApi + ?Sized>(
    api: &A,
    id: &str,
    interval: Duration,
    max_polls: usize,
) -> Result<SimulationJob> {
    for poll in 1..=max_polls {
        let job = api.get_fleet_simulation(id).await?;
        match &job.status {
            JobStatus::Failure => bail!("simulation {id} failed"),
            status if status.is_running() => {
                debug!(poll, ?status, "Simulation still running");
                if poll < max_polls {
                    tokio::time::sleep(interval).await;
                }
            }
            status => {
                info!(poll, ?status, "Simulation finished");
                return Ok(job);
            }
        }
    }
    bail!("simulation {id} still running after {max_polls} polls")
}
