//! Station records and nearby queries
//!
//! Only the subset of the station-metadata record needed for overlap
//! detection is modelled; any other backend fields are ignored.

use crate::constants::nearby::{MAX_RADIUS_KM, MIN_RADIUS_KM, RADIUS_STEP_KM};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A GNSS monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Backend identifier
    pub api_id: String,

    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// Recorded data has gaps
    #[serde(default)]
    pub has_gaps: bool,

    /// A station-info record exists
    #[serde(default = "default_true")]
    pub has_stationinfo: bool,
}

fn default_true() -> bool {
    true
}

impl Station {
    /// Create a station with no known data-quality problems
    pub fn new(api_id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            api_id: api_id.into(),
            lat: Some(lat),
            lon: Some(lon),
            has_gaps: false,
            has_stationinfo: true,
        }
    }

    /// Mark the station as having gaps in its data
    pub fn with_gaps(mut self, has_gaps: bool) -> Self {
        self.has_gaps = has_gaps;
        self
    }

    /// Set whether a station-info record exists
    pub fn with_stationinfo(mut self, has_stationinfo: bool) -> Self {
        self.has_stationinfo = has_stationinfo;
        self
    }

    /// Coordinates, if present and valid
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.lat?, self.lon?);
        coords.validate().ok().map(|_| coords)
    }

    /// Whether the station should be drawn with the warning style
    pub fn has_problem(&self) -> bool {
        self.has_gaps || !self.has_stationinfo
    }
}

/// Backend payload of the nearby-stations endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyResponse {
    #[serde(default)]
    pub nearby_stations: Vec<Station>,
}

/// A request for stations around a focal station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub station_id: String,
    pub radius_km: u32,
}

impl NearbyQuery {
    /// Build a query, rejecting radii the slider cannot produce
    pub fn new(station_id: impl Into<String>, radius_km: u32) -> Result<Self> {
        validate_radius(radius_km)?;
        Ok(Self {
            station_id: station_id.into(),
            radius_km,
        })
    }
}

/// Check a radius against the 100-200 km range and its 10 km step
pub fn validate_radius(radius_km: u32) -> Result<()> {
    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
        return Err(Error::InvalidRadius(format!(
            "Radius {} km is out of range [{}, {}]",
            radius_km, MIN_RADIUS_KM, MAX_RADIUS_KM
        )));
    }
    if (radius_km - MIN_RADIUS_KM) % RADIUS_STEP_KM != 0 {
        return Err(Error::InvalidRadius(format!(
            "Radius {} km is not a multiple of {} km",
            radius_km, RADIUS_STEP_KM
        )));
    }
    Ok(())
}

/// Parse a backend payload: either `{"nearby_stations": [...]}` or a bare array
pub fn parse_stations(json: &str) -> Result<Vec<Station>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.is_array() {
        Ok(serde_json::from_value(value)?)
    } else {
        let response: NearbyResponse = serde_json::from_value(value)?;
        Ok(response.nearby_stations)
    }
}
