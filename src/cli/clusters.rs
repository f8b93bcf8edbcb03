//! Clusters command handler
//!
//! Computes the overlap report for a station list saved from the backend,
//! without any network access.

use crate::cli::OverlapArgs;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{Coordinates, MapView};
use crate::overlap::OverlapDetector;
use crate::report::{build_report, ReportInput};
use crate::station::{parse_stations, Station};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Clusters command arguments
#[derive(Args)]
pub struct ClustersArgs {
    /// JSON file: `{"nearby_stations": [...]}` or a bare station array
    pub file: PathBuf,

    /// Map center latitude (defaults to the stations' mean)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Map center longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    #[command(flatten)]
    pub overlap: OverlapArgs,
}

/// Run the clusters command
pub fn run(args: ClustersArgs) -> Result<()> {
    let config = Config::load()?;
    let content = std::fs::read_to_string(&args.file)?;
    let stations = parse_stations(&content)?;
    info!("Loaded {} stations from {}", stations.len(), args.file.display());

    let center = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let center = Coordinates::new(lat, lon);
            center.validate()?;
            Some(center)
        }
        _ => {
            let coords: Vec<Coordinates> = stations.iter().filter_map(Station::coordinates).collect();
            Coordinates::centroid(coords.iter())
        }
    };

    let map = center.map(|c| MapView::new(c).with_zoom(args.overlap.zoom(&config)));
    let detector = OverlapDetector::new(map).with_override(args.overlap.override_distance(&config));
    let report = build_report(
        ReportInput::new(&stations, detector).with_strategy(args.overlap.strategy(&config)?),
    );

    args.overlap.emit(&report, &config)
}
