//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::report::OverlapReport;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &OverlapReport) -> Result<String> {
        let mut output = String::new();
        let request = &report.request;

        // Header
        output.push_str(&format!("gnss-nearby overlap report ({})\n", report.id));
        if let (Some(focal), Some(radius)) = (&request.focal_station, request.radius_km) {
            output.push_str(&format!("Focal station: {} (radius {} km)\n", focal, radius));
        }
        match report.threshold {
            Some(threshold) => {
                let source = if request.override_distance.is_some() {
                    "override"
                } else {
                    "map scale"
                };
                output.push_str(&format!("Threshold: {:.2}m ({})\n", threshold, source));
            }
            None => output.push_str("Threshold: n/a (no map)\n"),
        }
        output.push_str(&format!("Strategy: {}\n", request.strategy));
        output.push_str(&format!(
            "Stations: {} ({} overlapping, {} pairs)\n\n",
            report.station_count,
            report.overlapped.len(),
            report.pairs.len()
        ));

        // Clusters
        if report.clusters.is_empty() {
            output.push_str("Clusters: none\n");
        } else {
            output.push_str("Clusters:\n");
            for (i, cluster) in report.clusters.iter().enumerate() {
                let ids: Vec<&str> = cluster
                    .cluster
                    .stations
                    .iter()
                    .map(|s| s.api_id.as_str())
                    .collect();
                let flag = if cluster.cluster.has_problem { " [problem]" } else { "" };
                output.push_str(&format!(
                    "  #{} ({} stations){}: {}\n",
                    i + 1,
                    cluster.icon.child_count,
                    flag,
                    ids.join(", ")
                ));
            }
        }

        // Pairs
        if !report.pairs.is_empty() {
            output.push_str("\nOverlapping pairs:\n");
            for pair in &report.pairs {
                output.push_str(&format!("  {} <-> {}: {:.2}m\n", pair.a, pair.b, pair.distance));
            }
        }

        Ok(output)
    }
}
