//! GeoJSON output formatter
//!
//! One Point feature per cluster (at the members' mean position) and one per
//! individually drawn station.

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::report::OverlapReport;
use serde_json::{json, Value};

/// GeoJSON formatter - outputs a FeatureCollection of markers
pub struct GeoJsonFormatter;

fn point(lat: f64, lon: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        // GeoJSON positions are [lon, lat]
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": properties,
    })
}

impl OutputFormatter for GeoJsonFormatter {
    fn name(&self) -> &str {
        "geojson"
    }

    fn description(&self) -> &str {
        "GeoJSON FeatureCollection of markers and clusters"
    }

    fn format(&self, report: &OverlapReport) -> Result<String> {
        let mut features = Vec::new();

        for cluster in &report.clusters {
            let Some(position) = cluster.position else {
                continue;
            };
            let members: Vec<&str> = cluster
                .cluster
                .stations
                .iter()
                .map(|s| s.api_id.as_str())
                .collect();
            features.push(point(
                position.lat,
                position.lon,
                json!({
                    "kind": "cluster",
                    "child_count": cluster.icon.child_count,
                    "class_name": cluster.icon.class_name,
                    "stations": members,
                }),
            ));
        }

        for marker in &report.markers {
            features.push(point(
                marker.lat,
                marker.lon,
                json!({
                    "kind": "station",
                    "api_id": marker.api_id,
                    "has_problem": marker.has_problem,
                }),
            ));
        }

        let collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });

        Ok(serde_json::to_string_pretty(&collection)?)
    }
}
