use std::sync::Arc;

use anyhow::Result;

use gtfs::{Route, RouteID, VehiclePosition};

use crate::config::{LiveMode, SessionConfig};
use crate::live::{filter_by_routes, ConnectionState, LiveFeed, StreamManager};
use crate::{BackendClient, SelectedRouteEntry, SelectionSet};

/// Everything one user's view owns: the route catalog, which routes are selected, and the live
/// vehicle feed. Presentation code gets handed a reference to this instead of reaching for
/// globals.
pub struct Session {
    config: SessionConfig,
    catalog: Vec<Route>,
    selection: SelectionSet,
    live: StreamManager,
}

impl Session {
    pub fn new(config: SessionConfig, catalog: Vec<Route>, live: StreamManager) -> Self {
        Self {
            config,
            catalog,
            selection: SelectionSet::new(),
            live,
        }
    }

    /// Fetches the route catalog and wires the live feed up to the backend, without connecting
    /// yet.
    pub async fn open(config: SessionConfig) -> Result<(Self, BackendClient)> {
        let backend = BackendClient::new(&config.api_url, config.timing().idle_timeout)?;
        let catalog = backend.fetch_routes().await?;
        info!("Loaded {} routes from {}", catalog.len(), config.api_url);
        let feed = match config.live_mode {
            LiveMode::Stream => LiveFeed::Stream(Arc::new(backend.stream_transport())),
            LiveMode::Poll => LiveFeed::Poll(Arc::new(backend.poller())),
        };
        let live = StreamManager::new(feed, config.timing());
        Ok((Self::new(config, catalog, live), backend))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[Route] {
        &self.catalog
    }

    pub fn route(&self, route_id: &RouteID) -> Option<&Route> {
        self.catalog.iter().find(|r| &r.route_id == route_id)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle_route(&mut self, entry: SelectedRouteEntry) -> Result<()> {
        self.check_known(&entry)?;
        self.selection = self.selection.toggle(entry);
        Ok(())
    }

    pub fn replace_selection(&mut self, entries: Vec<SelectedRouteEntry>) -> Result<()> {
        for entry in &entries {
            self.check_known(entry)?;
        }
        self.selection = SelectionSet::replace_all(entries);
        Ok(())
    }

    /// `everything` should hold one entry per catalog route
    pub fn toggle_all(&mut self, everything: Vec<SelectedRouteEntry>) -> Result<()> {
        for entry in &everything {
            self.check_known(entry)?;
        }
        self.selection = self.selection.toggle_all(everything);
        Ok(())
    }

    pub fn live(&self) -> &StreamManager {
        &self.live
    }

    pub fn start_live(&mut self) {
        self.live.connect();
    }

    pub fn stop_live(&mut self) {
        self.live.stop();
    }

    pub fn live_state(&self) -> ConnectionState {
        self.live.state()
    }

    /// Vehicles on the selected routes, from the latest snapshot
    pub fn visible_vehicles(&self) -> Vec<VehiclePosition> {
        filter_by_routes(&self.live.snapshot().positions, &self.selection)
    }

    fn check_known(&self, entry: &SelectedRouteEntry) -> Result<()> {
        if self.route(entry.route_id()).is_none() {
            bail!("Route {} isn't in the catalog", entry.route_id());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use futures::future::BoxFuture;

    use super::*;
    use crate::live::{LiveTiming, PositionSource};
    use crate::selection::test::entry;

    struct FixedSource(String);

    impl PositionSource for FixedSource {
        fn fetch(&self) -> BoxFuture<'_, Result<String>> {
            let raw = self.0.clone();
            Box::pin(async move { Ok(raw) })
        }
    }

    fn session(frame: &str) -> Session {
        let catalog = ["5", "6", "9"].iter().map(|id| entry(id).route).collect();
        let live = StreamManager::new(
            LiveFeed::Poll(Arc::new(FixedSource(frame.to_string()))),
            LiveTiming::default(),
        );
        Session::new(SessionConfig::default(), catalog, live)
    }

    #[test]
    fn test_selection_stays_inside_catalog() {
        let mut session = session("{}");
        session.toggle_route(entry("5")).unwrap();
        assert!(session.toggle_route(entry("42")).is_err());
        assert!(session
            .replace_selection(vec![entry("6"), entry("42")])
            .is_err());
        assert_eq!(session.selection().len(), 1);

        session.toggle_route(entry("5")).unwrap();
        assert!(session.selection().is_empty());

        let everything: Vec<_> = ["5", "6", "9"].iter().map(|id| entry(id)).collect();
        session.toggle_all(everything.clone()).unwrap();
        assert_eq!(session.selection().len(), 3);
        session.toggle_all(everything).unwrap();
        assert!(session.selection().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_vehicles_follow_selection() {
        let mut session = session(
            r#"{"positions": [
                {"vehicle_id": "1", "route_id": "5", "latitude": 39.1, "longitude": -86.5},
                {"vehicle_id": "2", "route_id": "6", "latitude": 39.2, "longitude": -86.4}
            ]}"#,
        );
        session.start_live();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(session.live_state(), ConnectionState::Connected);
        assert!(session.visible_vehicles().is_empty());

        session.toggle_route(entry("6")).unwrap();
        let visible = session.visible_vehicles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].vehicle_id.as_str(), "2");

        session.toggle_route(entry("5")).unwrap();
        assert_eq!(session.visible_vehicles().len(), 2);

        session.stop_live();
        assert_eq!(session.live_state(), ConnectionState::Disconnected);
    }
}
