//! Nearby-station map view state
//!
//! The view is an immutable [`NearbyState`] snapshot advanced by a pure
//! [`update`] function. `update` never performs I/O; when an action calls
//! for new data it returns a [`FetchRequest`], which [`NearbyController`]
//! carries out against a [`NearbySource`] and feeds back as another action.

use crate::client::NearbySource;
use crate::cluster::ClusterStrategy;
use crate::constants::nearby::MIN_RADIUS_KM;
use crate::geo::{Coordinates, MapView};
use crate::overlap::OverlapDetector;
use crate::report::{build_report, OverlapReport, ReportInput};
use crate::station::{validate_radius, NearbyQuery, Station};
use tracing::{debug, error, warn};

/// Snapshot of the map view
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyState {
    /// Station the nearby list is centered on
    pub focal: Option<Station>,
    pub radius_km: u32,
    /// "Show nearby stations" toggle
    pub enabled: bool,
    /// Threshold override in meters
    pub override_distance: Option<f64>,
    pub strategy: ClusterStrategy,
    /// Last fetched nearby list
    pub stations: Vec<Station>,
}

impl Default for NearbyState {
    fn default() -> Self {
        Self {
            focal: None,
            radius_km: MIN_RADIUS_KM,
            enabled: true,
            override_distance: None,
            strategy: ClusterStrategy::default(),
            stations: Vec::new(),
        }
    }
}

/// Messages that advance the view
#[derive(Debug, Clone)]
pub enum Action {
    SelectStation(Option<Station>),
    SetRadius(u32),
    SetEnabled(bool),
    SetOverride(Option<f64>),
    SetStrategy(ClusterStrategy),
    NearbyLoaded(Vec<Station>),
    NearbyFailed(String),
}

/// A fetch the view wants performed
pub type FetchRequest = NearbyQuery;

impl NearbyState {
    /// The query for the current focal station and radius
    ///
    /// None when there is no focal station or the toggle is off.
    pub fn query(&self) -> Option<FetchRequest> {
        if !self.enabled {
            return None;
        }
        let focal = self.focal.as_ref()?;
        NearbyQuery::new(focal.api_id.clone(), self.radius_km).ok()
    }

    /// The map the markers are drawn on, centered on the focal station
    pub fn map_view(&self) -> Option<MapView> {
        let center = self
            .focal
            .as_ref()
            .and_then(Station::coordinates)
            .or_else(|| {
                let coords: Vec<Coordinates> = self.stations.iter().filter_map(Station::coordinates).collect();
                Coordinates::centroid(coords.iter())
            })?;
        Some(MapView::new(center))
    }

    /// Derive pairs, clusters and markers from this snapshot
    pub fn report(&self) -> OverlapReport {
        let detector = OverlapDetector::new(self.map_view()).with_override(self.override_distance);
        let mut input = ReportInput::new(&self.stations, detector).with_strategy(self.strategy);
        if let Some(focal) = &self.focal {
            input = input.with_query(focal.api_id.clone(), self.radius_km);
        }
        build_report(input)
    }
}

/// Apply an action to a snapshot
pub fn update(state: &NearbyState, action: Action) -> (NearbyState, Option<FetchRequest>) {
    let mut next = state.clone();

    match action {
        Action::SelectStation(station) => {
            next.focal = station;
            next.stations.clear();
            (next.clone(), next.query())
        }
        Action::SetRadius(radius_km) => {
            if let Err(e) = validate_radius(radius_km) {
                warn!("Ignoring radius change: {}", e);
                return (next, None);
            }
            next.radius_km = radius_km;
            (next.clone(), next.query())
        }
        Action::SetEnabled(enabled) => {
            next.enabled = enabled;
            if !enabled {
                next.stations.clear();
            }
            (next.clone(), next.query())
        }
        Action::SetOverride(distance) => {
            next.override_distance = distance.filter(|d| *d >= 0.0);
            (next, None)
        }
        Action::SetStrategy(strategy) => {
            next.strategy = strategy;
            (next, None)
        }
        Action::NearbyLoaded(stations) => {
            next.stations = stations;
            (next, None)
        }
        Action::NearbyFailed(_) => {
            next.stations.clear();
            (next, None)
        }
    }
}

/// Owns the view snapshot and performs the fetches it asks for
#[derive(Debug)]
pub struct NearbyController<S> {
    source: S,
    state: NearbyState,
}

impl<S: NearbySource> NearbyController<S> {
    pub fn new(source: S, state: NearbyState) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> &NearbyState {
        &self.state
    }

    /// Apply an action, running any fetch it triggers
    pub async fn dispatch(&mut self, action: Action) {
        let (next, request) = update(&self.state, action);
        self.state = next;

        if let Some(query) = request {
            let outcome = self.fetch(&query).await;
            let (next, _) = update(&self.state, outcome);
            self.state = next;
        }
    }

    /// Re-run the fetch for the current snapshot
    ///
    /// No-op without a focal station or with the toggle off.
    pub async fn refresh(&mut self) {
        if let Some(query) = self.state.query() {
            let outcome = self.fetch(&query).await;
            let (next, _) = update(&self.state, outcome);
            self.state = next;
        }
    }

    async fn fetch(&self, query: &FetchRequest) -> Action {
        match self.source.nearby_stations(query).await {
            Ok(stations) => {
                debug!("Loaded {} stations near {}", stations.len(), query.station_id);
                Action::NearbyLoaded(stations)
            }
            Err(e) => {
                error!("Failed to fetch stations near {}: {}", query.station_id, e);
                Action::NearbyFailed(e.to_string())
            }
        }
    }

    pub fn report(&self) -> OverlapReport {
        self.state.report()
    }
}
