use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use gtfs::api::{RouteGeometryResponse, RoutesResponse, ScheduleResponse};
use gtfs::{Route, RouteGeometry, RouteID, ScheduleOutcome};

use crate::live::{HttpPoller, HttpStreamTransport};
use crate::SelectedRouteEntry;

/// Talks to the transit backend, which has already parsed the raw GTFS into JSON.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Only connecting is bounded by `connect_timeout`. The vehicle stream stays open
    /// indefinitely, so idle reads are timed out by the live feed instead.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The catalog of every known route
    pub async fn fetch_routes(&self) -> Result<Vec<Route>> {
        let resp: RoutesResponse = self.get_json("routes").await?;
        Ok(resp.into_routes()?)
    }

    pub async fn fetch_schedule(&self, route_id: &RouteID) -> Result<ScheduleOutcome> {
        let resp: ScheduleResponse = self
            .get_json(&format!("routes/{route_id}/schedule"))
            .await?;
        let outcome = resp
            .into_outcome()
            .with_context(|| format!("schedule for route {route_id}"))?;
        if let ScheduleOutcome::Stops(ref entries) = outcome {
            debug!("Route {route_id} schedule covers {} stops", entries.len());
        }
        Ok(outcome)
    }

    pub async fn fetch_route_geometry(&self, route_id: &RouteID) -> Result<RouteGeometry> {
        let resp: RouteGeometryResponse = self.get_json(&format!("routes/{route_id}")).await?;
        let geometry = resp
            .into_geometry()
            .with_context(|| format!("geometry for route {route_id}"))?;
        if geometry.route.route_id != *route_id {
            bail!(
                "Asked for route {route_id}, but got {}",
                geometry.route.route_id
            );
        }
        Ok(geometry)
    }

    pub async fn fetch_selection_entry(&self, route_id: &RouteID) -> Result<SelectedRouteEntry> {
        Ok(self.fetch_route_geometry(route_id).await?.into())
    }

    /// Everything needed to "select all"
    pub async fn fetch_all_entries(&self, catalog: &[Route]) -> Result<Vec<SelectedRouteEntry>> {
        let mut entries = Vec::new();
        for route in catalog {
            entries.push(self.fetch_selection_entry(&route.route_id).await?);
        }
        Ok(entries)
    }

    pub fn stream_transport(&self) -> HttpStreamTransport {
        HttpStreamTransport::new(self.client.clone(), self.url("vehicles/stream"))
    }

    pub fn poller(&self) -> HttpPoller {
        HttpPoller::new(self.client.clone(), self.url("vehicles"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            bail!("GET {url}: network response was not ok ({})", resp.status());
        }
        resp.json()
            .await
            .with_context(|| format!("GET {url}: unexpected response"))
    }
}
