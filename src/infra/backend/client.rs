use anyhow::{Context, Result};
use async_trait::async_trait;
use fleet_charts::fetch::{HttpClient, fetch_bytes};
use fleet_charts::parser::parse_simulation;
use fleet_charts::simulation::SimulationJob;

use crate::services::backend_api::FleetApi;

/// Fleet backend reached over HTTP.
pub struct FleetBackendClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> FleetBackendClient<C> {
    pub fn new(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn simulation_url(&self, id: &str) -> String {
        format!("{}/fleet-simulation/simulation/{}", self.base_url, id)
    }
}

#[async_trait]
impl<C: HttpClient> FleetApi for FleetBackendClient<C> {
    #[tracing::instrument(skip(self))]
    async fn get_fleet_simulation(&self, id: &str) -> Result<SimulationJob> {
        let url = self.simulation_url(id);
        let bytes = fetch_bytes(&self.http, &url)
            .await
            .with_context(|| format!("failed to fetch simulation {id}"))?;
        parse_simulation(&bytes)
    }
}
