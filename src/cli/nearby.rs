//! Nearby command handler
//!
//! Fetches the stations around a focal station from the backend and reports
//! which markers would overlap on the map.

use crate::cli::OverlapArgs;
use crate::client::{ApiClient, NearbySource};
use crate::config::Config;
use crate::constants::nearby::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use crate::error::Result;
use crate::geo::{Coordinates, MapView};
use crate::overlap::OverlapDetector;
use crate::report::{build_report, ReportInput};
use crate::station::{NearbyQuery, Station};
use clap::Args;
use tracing::info;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Focal station identifier
    pub station_id: String,

    /// Search radius in kilometers (100-200, step 10)
    #[arg(long, short = 'r', value_parser = clap::value_parser!(u32).range(MIN_RADIUS_KM as i64..=MAX_RADIUS_KM as i64))]
    pub radius: Option<u32>,

    /// Backend base URL
    #[arg(long)]
    pub api_url: Option<String>,

    #[command(flatten)]
    pub overlap: OverlapArgs,
}

/// Run the nearby command
pub async fn run(args: NearbyArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }

    if !config.nearby.enabled {
        eprintln!("Nearby stations are disabled (nearby.enabled = false)");
        return Ok(());
    }

    let radius = args.radius.unwrap_or(config.nearby.radius_km);
    let query = NearbyQuery::new(&args.station_id, radius)?;
    let strategy = args.overlap.strategy(&config)?;

    let client = ApiClient::new(&config.api)?;
    info!("Fetching stations within {} km of {}", radius, query.station_id);
    let stations = client.nearby_stations(&query).await?;

    let detector = OverlapDetector::new(map_for(&query.station_id, &stations).map(|view| {
        view.with_zoom(args.overlap.zoom(&config))
    }))
    .with_override(args.overlap.override_distance(&config));

    let report = build_report(
        ReportInput::new(&stations, detector)
            .with_strategy(strategy)
            .with_query(query.station_id.clone(), query.radius_km),
    );

    args.overlap.emit(&report, &config)
}

/// Center on the focal station when it is in the list, otherwise on the mean
fn map_for(station_id: &str, stations: &[Station]) -> Option<MapView> {
    let center = stations
        .iter()
        .find(|s| s.api_id == station_id)
        .and_then(Station::coordinates)
        .or_else(|| {
            let coords: Vec<Coordinates> = stations.iter().filter_map(Station::coordinates).collect();
            Coordinates::centroid(coords.iter())
        })?;
    Some(MapView::new(center))
}
