//! Overlap report and marker descriptors
//!
//! Ties the overlap scan and the cluster builder together and describes the
//! result in terms the map widget consumes: one icon per cluster and one
//! marker per station drawn on its own.

use crate::cluster::{build_clusters, Cluster, ClusterStrategy};
use crate::constants::icon::{CLUSTER_DANGEROUS_CLASS, CLUSTER_NORMAL_CLASS};
use crate::geo::{Coordinates, MapView};
use crate::overlap::{OverlapDetector, OverlapPair};
use crate::station::Station;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cluster icon descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIcon {
    pub child_count: usize,
    pub class_name: String,
}

impl ClusterIcon {
    /// Icon for a cluster of `child_count` stations
    pub fn new(child_count: usize, has_problem: bool) -> Self {
        let class_name = if has_problem {
            CLUSTER_DANGEROUS_CLASS
        } else {
            CLUSTER_NORMAL_CLASS
        };
        Self {
            child_count,
            class_name: class_name.to_string(),
        }
    }

    pub fn is_dangerous(&self) -> bool {
        self.class_name == CLUSTER_DANGEROUS_CLASS
    }
}

/// A cluster ready to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedCluster {
    #[serde(flatten)]
    pub cluster: Cluster,
    pub icon: ClusterIcon,
    /// Mean of the members' coordinates
    pub position: Option<Coordinates>,
}

impl From<Cluster> for RenderedCluster {
    fn from(cluster: Cluster) -> Self {
        let coords: Vec<Coordinates> = cluster.stations.iter().filter_map(Station::coordinates).collect();
        Self {
            icon: ClusterIcon::new(cluster.len(), cluster.has_problem),
            position: Coordinates::centroid(coords.iter()),
            cluster,
        }
    }
}

/// A station drawn as an individual pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMarker {
    pub api_id: String,
    pub lat: f64,
    pub lon: f64,
    pub has_problem: bool,
}

/// Settings an overlap report was computed with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_station: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<u32>,
    pub map: Option<MapView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_distance: Option<f64>,
    pub strategy: ClusterStrategy,
}

/// Everything derived from one nearby-station list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub request: ReportRequest,
    /// Overlap threshold in meters (absent without a map)
    pub threshold: Option<f64>,
    pub station_count: usize,
    pub pairs: Vec<OverlapPair>,
    pub overlapped: Vec<Station>,
    pub clusters: Vec<RenderedCluster>,
    /// Stations with coordinates that belong to no cluster
    pub markers: Vec<StationMarker>,
}

/// Inputs for building a report
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub stations: &'a [Station],
    pub detector: OverlapDetector,
    pub strategy: ClusterStrategy,
    pub focal_station: Option<String>,
    pub radius_km: Option<u32>,
}

impl<'a> ReportInput<'a> {
    pub fn new(stations: &'a [Station], detector: OverlapDetector) -> Self {
        Self {
            stations,
            detector,
            strategy: ClusterStrategy::default(),
            focal_station: None,
            radius_km: None,
        }
    }

    pub fn with_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_query(mut self, focal_station: impl Into<String>, radius_km: u32) -> Self {
        self.focal_station = Some(focal_station.into());
        self.radius_km = Some(radius_km);
        self
    }
}

/// Run the overlap scan and clustering over a station list
pub fn build_report(input: ReportInput<'_>) -> OverlapReport {
    let detector = input.detector;
    let (pairs, overlapped) = detector.scan(input.stations);
    let clusters = build_clusters(&overlapped, &detector, input.strategy);

    let markers = input
        .stations
        .iter()
        .filter(|s| !clusters.iter().any(|c| c.contains(&s.api_id)))
        .filter_map(|s| {
            let coords = s.coordinates()?;
            Some(StationMarker {
                api_id: s.api_id.clone(),
                lat: coords.lat,
                lon: coords.lon,
                has_problem: s.has_problem(),
            })
        })
        .collect();

    tracing::debug!(
        stations = input.stations.len(),
        pairs = pairs.len(),
        clusters = clusters.len(),
        "computed overlap report"
    );

    OverlapReport {
        id: Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        request: ReportRequest {
            focal_station: input.focal_station,
            radius_km: input.radius_km,
            map: detector.map(),
            override_distance: detector.override_distance(),
            strategy: input.strategy,
        },
        threshold: detector.threshold(),
        station_count: input.stations.len(),
        pairs,
        overlapped,
        clusters: clusters.into_iter().map(RenderedCluster::from).collect(),
        markers,
    }
}
